mod calendar;
mod content;
mod event;
mod raw;

pub use calendar::*;
pub use content::*;
pub use event::*;
pub use raw::*;
