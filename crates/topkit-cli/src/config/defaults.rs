use topkit::parser::topology::DEFAULT_MAX_INCLUDE_DEPTH;

pub struct DefaultsConfig {
    pub preprocessing: bool,
    pub max_include_depth: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preprocessing: true,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}
