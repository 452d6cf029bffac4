pub mod machine_output;
pub mod paths;
pub mod preflight;
pub mod sanitize;
