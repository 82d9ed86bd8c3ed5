mod collection;
mod preview;
mod selection;

pub use collection::{Frame, FrameCollection};
pub use preview::Preview;
pub use selection::SelectionSet;
