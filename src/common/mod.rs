pub(crate) mod math;
pub(crate) mod vec3d;
