use crate::domain::{Ww3Error, Ww3Result};
use std::collections::BTreeMap;

/// Values substituted into `{key}` placeholders of a namelist template.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    values: BTreeMap<&'static str, String>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

pub fn render_template(template: &str, values: &TemplateValues) -> Ww3Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let close = after_open.find('}').ok_or_else(|| {
            Ww3Error::internal(
                "SYS.TEMPLATE_UNTERMINATED",
                format!(
                    "unterminated template placeholder near '{}'",
                    after_open.lines().next().unwrap_or_default()
                ),
            )
        })?;

        let key = &after_open[..close];
        let value = values.get(key).ok_or_else(|| {
            Ww3Error::internal(
                "SYS.TEMPLATE_KEY",
                format!("template placeholder '{{{}}}' has no value", key),
            )
        })?;
        rendered.push_str(value);
        rest = &after_open[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
