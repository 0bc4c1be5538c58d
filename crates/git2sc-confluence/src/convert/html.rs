//! HTML passthrough.

use std::path::Path;

use super::{Converter, expand_home};
use crate::error::ConvertError;

/// Reads HTML files verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlConverter;

impl Converter for HtmlConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        Ok(std::fs::read_to_string(expand_home(path))?)
    }
}
