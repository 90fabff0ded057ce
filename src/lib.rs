pub mod dump;
pub mod memtype;
pub mod probe;
pub mod profile;
pub mod report;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;
