//! Size observation primitives.
//!
//! A [`ResizeObserver`] is the native mechanism that reports box changes of
//! the elements it observes. Backends deliver one batch of [`ResizeEntry`]
//! values per notification to the handler they were connected with.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResizeResult;

pub mod area;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod tests;

/// Which box of the element is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservedBox {
    /// Content plus padding and border
    #[default]
    BorderBox,
    /// Content only
    ContentBox,
}

impl ObservedBox {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservedBox::BorderBox => "border-box",
            ObservedBox::ContentBox => "content-box",
        }
    }
}

impl fmt::Display for ObservedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown box name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown box model `{0}`, expected `border-box` or `content-box`")]
pub struct ParseObservedBoxError(String);

impl FromStr for ObservedBox {
    type Err = ParseObservedBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "border-box" => Ok(ObservedBox::BorderBox),
            "content-box" => Ok(ObservedBox::ContentBox),
            other => Err(ParseObservedBoxError(other.to_string())),
        }
    }
}

/// Last known size of an observed element, in whole units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ObservedDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Whether any measurement has been recorded yet
    pub fn is_measured(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

/// Size of one box fragment, in writing-mode relative axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSize {
    pub inline_size: f64,
    pub block_size: f64,
}

impl BoxSize {
    pub fn new(inline_size: f64, block_size: f64) -> Self {
        Self {
            inline_size,
            block_size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One raw size report for one observed target
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeEntry<T> {
    pub target: T,
    pub border_box_size: Option<BoxSize>,
    pub content_box_size: Option<BoxSize>,
    pub content_rect: ContentRect,
}

impl<T> ResizeEntry<T> {
    /// Normalize the report into whole-unit dimensions.
    ///
    /// Box sizes are used when the backend reports both of them; otherwise
    /// the content rectangle is used regardless of `observed_box`.
    pub fn dimensions(&self, observed_box: ObservedBox) -> ObservedDimensions {
        let (width, height) = match (self.border_box_size, self.content_box_size) {
            (Some(border), Some(content)) => {
                let size = match observed_box {
                    ObservedBox::BorderBox => border,
                    ObservedBox::ContentBox => content,
                };
                (size.inline_size, size.block_size)
            }
            _ => (self.content_rect.width, self.content_rect.height),
        };

        ObservedDimensions {
            width: Some(round_to_unit(width)),
            height: Some(round_to_unit(height)),
        }
    }
}

// `as` saturates, so negative or NaN sizes collapse to zero.
fn round_to_unit(value: f64) -> u32 {
    value.round() as u32
}

/// Entry handler a backend invokes with each batch of reports
pub type ResizeHandler<T> = Rc<dyn Fn(&[ResizeEntry<T>])>;

/// The native size observation mechanism.
///
/// Implementations own one subscription that can watch any number of
/// targets; the resize adapter only ever asks it to watch one.
pub trait ResizeObserver: Sized + 'static {
    /// The element type this mechanism can observe
    type Target: Clone + PartialEq + fmt::Debug + 'static;

    /// Create the subscription, failing when the mechanism is unavailable
    fn connect(handler: ResizeHandler<Self::Target>) -> ResizeResult<Self>;

    /// Start reporting size changes of `target`
    fn observe(&self, target: &Self::Target, observed_box: ObservedBox);

    /// Stop reporting size changes of `target`
    fn unobserve(&self, target: &Self::Target);

    /// Stop reporting anything
    fn disconnect(&self);
}
