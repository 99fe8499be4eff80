use core::fmt;

/// Name qualified by the namespace it is defined in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: Option<String>,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self { namespace_index, name: Some(name.into()) }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name.as_deref().unwrap_or(""))
    }
}

/// Human readable text with an optional locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: Option<String>,
}

impl LocalizedText {
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self { locale: Some(locale.into()), text: Some(text.into()) }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { locale: None, text: Some(text.into()) }
    }

    pub(crate) fn encoding_mask(&self) -> u8 {
        let mut mask = 0;
        if self.locale.is_some() {
            mask |= 0x01;
        }
        if self.text.is_some() {
            mask |= 0x02;
        }
        mask
    }
}

/// An XML fragment, carried on the wire as its UTF-8 bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlElement(Vec<u8>);

impl XmlElement {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for XmlElement {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_text_mask() {
        assert_eq!(LocalizedText::default().encoding_mask(), 0);
        assert_eq!(LocalizedText::text("hi").encoding_mask(), 0x02);
        assert_eq!(LocalizedText::new("en", "hi").encoding_mask(), 0x03);
        let locale_only = LocalizedText { locale: Some("de".into()), text: None };
        assert_eq!(locale_only.encoding_mask(), 0x01);
    }
}
