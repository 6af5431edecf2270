//! Built-in label catalogs (zh-CN, en) behind a small translation trait.

use serde::{Deserialize, Serialize};

pub trait Translator: Send + Sync {
    /// Look up `key`. Unknown keys come back unchanged.
    fn translate(&self, key: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh-cn" | "zh" => Ok(Locale::ZhCn),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(format!("unknown locale: {}", other)),
        }
    }
}

const ZH_CN: &[(&str, &str)] = &[
    ("footer.typeYourMessage", "输入消息..."),
    ("footer.attachmentPrefix", "[附件]"),
    ("footer.attachmentsSent", "[用户发送了 {count} 个附件: {names}]"),
    ("footer.filesSelected", "已选择文件: {names}\n\n正在发送到服务器..."),
    ("footer.processingFailed", "文件处理失败，请重试"),
    ("footer.sendFailed", "附件发送失败: {names}"),
    ("footer.pickFiles", "输入文件路径 ({accept})"),
    ("footer.reading", "正在读取附件..."),
    ("footer.interrupted", "已打断"),
];

const EN: &[(&str, &str)] = &[
    ("footer.typeYourMessage", "Type your message..."),
    ("footer.attachmentPrefix", "[Attachment]"),
    ("footer.attachmentsSent", "[User sent {count} attachment(s): {names}]"),
    ("footer.filesSelected", "Selected files: {names}\n\nSending to server..."),
    ("footer.processingFailed", "File processing failed, please try again"),
    ("footer.sendFailed", "Failed to send attachments: {names}"),
    ("footer.pickFiles", "Enter file paths ({accept})"),
    ("footer.reading", "Reading attachments..."),
    ("footer.interrupted", "Interrupted"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Labels {
    locale: Locale,
}

impl Labels {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Translator for Labels {
    fn translate(&self, key: &str) -> String {
        let table = match self.locale {
            Locale::ZhCn => ZH_CN,
            Locale::En => EN,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Replace `{name}` placeholders in a translated template.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_cover_the_same_keys() {
        for (key, _) in ZH_CN {
            assert!(EN.iter().any(|(k, _)| k == key), "en is missing {}", key);
        }
        assert_eq!(ZH_CN.len(), EN.len());
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(Labels::default().translate("nope.key"), "nope.key");
    }

    #[test]
    fn test_fill() {
        let t = Labels::new(Locale::ZhCn).translate("footer.attachmentsSent");
        assert_eq!(
            fill(&t, &[("count", "2"), ("names", "a.png, b.pdf")]),
            "[用户发送了 2 个附件: a.png, b.pdf]"
        );
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("zh-CN".parse::<Locale>().unwrap(), Locale::ZhCn);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
