use crate::edit::overlay::{FONT_SIZE_MAX_PX, FONT_SIZE_MIN_PX};
use crate::foundation::error::{OvertextError, OvertextResult};

/// How raw text from the font-size field is turned into a size.
///
/// An unparseable field never reaches the overlay under either policy: the previous size is
/// kept and the caller gets a validation error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizeInputPolicy {
    /// Out-of-range values are rejected.
    #[default]
    Reject,
    /// Out-of-range values are clamped into the control's range.
    Clamp,
}

impl FontSizeInputPolicy {
    /// Parse `raw` into a font size under this policy.
    pub fn apply(self, raw: &str) -> OvertextResult<u32> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OvertextError::validation("font size field is empty"));
        }
        let value: i64 = trimmed.parse().map_err(|_| {
            OvertextError::validation(format!("font size \"{trimmed}\" is not an integer"))
        })?;

        let min = i64::from(FONT_SIZE_MIN_PX);
        let max = i64::from(FONT_SIZE_MAX_PX);
        match self {
            FontSizeInputPolicy::Reject if !(min..=max).contains(&value) => {
                Err(OvertextError::validation(format!(
                    "font size {value} outside [{min}, {max}]"
                )))
            }
            FontSizeInputPolicy::Reject => Ok(value as u32),
            FontSizeInputPolicy::Clamp => Ok(value.clamp(min, max) as u32),
        }
    }
}

/// Round a resized font size and keep it inside the control's range.
pub(crate) fn normalize_resized_font_size(old_px: u32, scale_x: f64) -> u32 {
    let scaled = (f64::from(old_px) * scale_x).round();
    scaled.clamp(f64::from(FONT_SIZE_MIN_PX), f64::from(FONT_SIZE_MAX_PX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/edit/input.rs"]
mod tests;
