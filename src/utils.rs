pub mod artifacts;
pub mod constants;
pub mod errors;
pub mod file_utils;
pub mod isa;
pub mod layout;
pub mod multiqc;
pub mod prefix_map;
pub mod remote;
pub mod run_config;
pub mod table;

#[cfg(test)]
pub(crate) mod test_utils;
