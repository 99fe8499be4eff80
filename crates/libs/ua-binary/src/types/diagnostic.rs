use super::StatusCode;

/// Vendor diagnostics attached to a failed operation.
///
/// The four `i32` fields are indices into the response's string table, not
/// the strings themselves. Inner diagnostics form a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace_uri: Option<i32>,
    pub localized_text: Option<i32>,
    pub locale: Option<i32>,
    pub additional_info: Option<String>,
    pub inner_status_code: Option<StatusCode>,
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

impl DiagnosticInfo {
    pub const SYMBOLIC_ID: u8 = 0x01;
    pub const NAMESPACE_URI: u8 = 0x02;
    pub const LOCALIZED_TEXT: u8 = 0x04;
    pub const LOCALE: u8 = 0x08;
    pub const ADDITIONAL_INFO: u8 = 0x10;
    pub const INNER_STATUS_CODE: u8 = 0x20;
    pub const INNER_DIAGNOSTIC_INFO: u8 = 0x40;

    pub fn with_inner(mut self, inner: DiagnosticInfo) -> Self {
        self.inner_diagnostic_info = Some(Box::new(inner));
        self
    }

    /// Number of diagnostics in the chain, this one included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(inner) = current.inner_diagnostic_info.as_deref() {
            depth += 1;
            current = inner;
        }
        depth
    }

    pub(crate) fn encoding_mask(&self) -> u8 {
        let mut mask = 0;
        if self.symbolic_id.is_some() {
            mask |= Self::SYMBOLIC_ID;
        }
        if self.namespace_uri.is_some() {
            mask |= Self::NAMESPACE_URI;
        }
        if self.localized_text.is_some() {
            mask |= Self::LOCALIZED_TEXT;
        }
        if self.locale.is_some() {
            mask |= Self::LOCALE;
        }
        if self.additional_info.is_some() {
            mask |= Self::ADDITIONAL_INFO;
        }
        if self.inner_status_code.is_some() {
            mask |= Self::INNER_STATUS_CODE;
        }
        if self.inner_diagnostic_info.is_some() {
            mask |= Self::INNER_DIAGNOSTIC_INFO;
        }
        mask
    }
}
