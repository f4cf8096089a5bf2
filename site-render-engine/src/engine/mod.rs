pub mod assets;
pub mod core;
pub mod dom;
pub mod loading;
pub mod motion;
pub mod narrative;
pub mod regions;
pub mod scene;
pub mod schedule;
pub mod scroll;
pub mod systems;
