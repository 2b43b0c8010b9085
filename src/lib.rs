//! audiomorph library - audio-reactive sphere morphing

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod mesh;
pub mod morph;
pub mod noise;
pub mod params;
pub mod rendering;
pub mod scheduler;
pub mod spectrum;
