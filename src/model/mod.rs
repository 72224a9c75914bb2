pub mod config {
    pub use vivarium_core::config::*;
}
pub mod events {
    pub use vivarium_core::events::*;
}
pub mod interaction {
    pub use vivarium_core::interaction::*;
}
pub mod lifecycle {
    pub use vivarium_core::lifecycle::*;
}
pub mod persistence {
    pub use vivarium_io::*;
}
pub mod state {
    pub use vivarium_data::*;
}

pub mod food;
pub mod habitat;
pub mod rewards;
