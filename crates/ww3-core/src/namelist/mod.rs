//! Namelist text handling: block editing, template rendering and literal
//! formatting.
//!
//! A block starts at a line holding its `&NAME` marker and runs up to and
//! including the first `/` after it.

pub mod format;
pub mod template;

use crate::domain::{Ww3Error, Ww3Result};
use tracing::warn;

pub use template::{TemplateValues, render_template};

const REMOVED_NOTE: &str = "WAS REMOVED by ww3-rs block editor.";
const ADDED_NOTE: &str = "\n! TEXT ADDED by ww3-rs block editor.";

/// Where a new block goes when its marker is not already in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockPosition {
    #[default]
    End,
    /// Character offset into the current text.
    At(usize),
}

/// A pending edit on namelist text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEdit {
    Remove { marker: String },
    Add { block: String, position: BlockPosition },
}

impl BlockEdit {
    pub fn remove(marker: impl Into<String>) -> Self {
        Self::Remove {
            marker: marker.into(),
        }
    }

    pub fn add(block: impl Into<String>, position: BlockPosition) -> Self {
        Self::Add {
            block: block.into(),
            position,
        }
    }

    pub fn apply(&self, text: &str) -> Ww3Result<String> {
        match self {
            Self::Remove { marker } => remove_block(text, marker),
            Self::Add { block, position } => add_block(text, block, *position),
        }
    }
}

/// First line of a block, used to find an existing copy of it.
pub fn block_marker(block: &str) -> &str {
    block.lines().next().unwrap_or_default()
}

pub fn remove_block(text: &str, marker: &str) -> Ww3Result<String> {
    if !marker.starts_with('&') {
        return Err(Ww3Error::malformed_block(
            "BLOCK.MARKER",
            format!("block marker '{}' must start with '&'", marker),
        ));
    }

    let Some((head, tail)) = split_around_block(text, marker) else {
        return Err(Ww3Error::malformed_block(
            "BLOCK.NOT_FOUND",
            format!("could not find block '{}' in namelist text", marker),
        ));
    };

    Ok(format!("{head}\n! {marker} {REMOVED_NOTE}{tail}"))
}

pub fn add_block(text: &str, block: &str, position: BlockPosition) -> Ww3Result<String> {
    if !block.starts_with('&') {
        return Err(Ww3Error::malformed_block(
            "BLOCK.START",
            "namelist block must start with '&'",
        ));
    }
    if !block.ends_with('/') {
        return Err(Ww3Error::malformed_block(
            "BLOCK.END",
            "namelist block must end with '/'",
        ));
    }

    let marker = block_marker(block);
    if let Some((head, tail)) = split_around_block(text, marker) {
        warn!(
            "Block {} is already present; it will be replaced by the new block",
            marker
        );
        return Ok(format!("{head}{ADDED_NOTE}\n{block}{tail}"));
    }

    match position {
        BlockPosition::End => Ok(format!("{text}{ADDED_NOTE}\n{block}\n")),
        BlockPosition::At(offset) => {
            let split = byte_offset(text, offset).ok_or_else(|| {
                Ww3Error::invalid_value(
                    "BLOCK.POSITION",
                    format!(
                        "insert position {} is past the end of the namelist text ({} characters)",
                        offset,
                        text.chars().count()
                    ),
                )
            })?;
            Ok(format!("{}\n{}{}\n", &text[..split], block, &text[split..]))
        }
    }
}

/// Text before the first `marker`, and text after the `/` closing that block.
/// A block with no closing `/` swallows the rest of the text.
fn split_around_block<'a>(text: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let start = text.find(marker)?;
    let body = &text[start + marker.len()..];
    let tail = body.find('/').map_or("", |close| &body[close + 1..]);
    Some((&text[..start], tail))
}

fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    if chars == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}
