pub mod file;
pub mod sysfs;
