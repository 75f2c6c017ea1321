//! Page observer: accepted-submission detection and code extraction.

pub mod dom;
pub mod driver;
pub mod extract;
pub mod machine;

pub use dom::{ElementSnapshot, LivePage, PageDom, PageSnapshot};
pub use driver::{PageEvent, PageUi};
pub use machine::{Detection, ObserverState, PageObserver};
