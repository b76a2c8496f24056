/* This file is part of the TikFetch project
*
*  Copyright (C) 2026 TikFetch contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Display helpers for rendering [`crate::VideoMetadata`] to users

pub trait RenderNumber {
    /// Render a counter in an abbreviated form, with at most one decimal:
    /// for example: 1500 will become 1.5K, 2000000 will become 2M
    fn abbreviate_int(&self) -> String;
}

fn with_suffix(value: f64, unit: f64, suffix: char) -> String {
    let rendered = format!("{:.1}", value / unit);
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{rendered}{suffix}")
}

macro_rules! define_abbreviate_int {
    ($($type: ident),+) => {
    $(
        impl RenderNumber for $type {
            #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
            fn abbreviate_int(&self) -> String {
                match self {
                    (0..=999) => format!("{self}"),
                    (1_000..=999_999) => with_suffix(*self as f64, 1e3, 'K'),
                    (1_000_000..) => with_suffix(*self as f64, 1e6, 'M'),
                }
            }
        }
    )+
    };
}

define_abbreviate_int!(u32, u64, usize);

/// Render a duration in seconds as `m:ss`
pub fn render_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
