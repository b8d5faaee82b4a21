pub mod assets;
pub mod camera;
pub mod character;
pub mod core;
pub mod input;
pub mod loading;
pub mod scene;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_support;
