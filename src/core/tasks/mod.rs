pub mod manager;
pub mod types;

pub use manager::TaskManager;
pub use types::{
    apply_update,
    Action,
    ChannelView,
    FormSnapshot,
    ViewUpdate,
};
