//! Theme: raw colors in `palette`, semantic styles in `styles`

pub mod palette;
pub mod styles;
