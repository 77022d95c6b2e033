//! Material descriptions
//!
//! A material here is only a name and the set of parameters its shader
//! declares. Renderers check the set once and skip what is not declared.

use std::collections::BTreeSet;
use std::fmt;

/// Parameters a renderer knows how to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialParameter {
    /// Object-to-world matrix
    ModelMatrix,
    /// World-to-camera matrix
    ViewMatrix,
    /// World-space light position
    LightPosition,
}

impl MaterialParameter {
    /// Every known parameter
    pub const ALL: [Self; 3] = [Self::ModelMatrix, Self::ViewMatrix, Self::LightPosition];

    /// Uniform name as written in shader sources
    pub fn uniform_name(self) -> &'static str {
        match self {
            Self::ModelMatrix => "model_matrix",
            Self::ViewMatrix => "view_matrix",
            Self::LightPosition => "light_pos",
        }
    }

    /// Look a parameter up by uniform name
    pub fn from_uniform_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|parameter| parameter.uniform_name() == name)
    }
}

impl fmt::Display for MaterialParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_name())
    }
}

/// Named material and the parameters it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    name: String,
    parameters: BTreeSet<MaterialParameter>,
}

impl Material {
    /// Material declaring no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeSet::new(),
        }
    }

    /// Material declaring every known parameter
    pub fn lit(name: impl Into<String>) -> Self {
        Self::new(name).with_parameters(MaterialParameter::ALL)
    }

    /// Builder-style parameter declaration
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = MaterialParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Declare parameters from shader uniform names; unknown names are ignored
    pub fn with_uniforms<'a>(self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let parameters = names.into_iter().filter_map(|name| {
            let parameter = MaterialParameter::from_uniform_name(name);
            if parameter.is_none() {
                log::trace!("Ignoring unknown uniform '{}'", name);
            }
            parameter
        });
        self.with_parameters(parameters)
    }

    /// Material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the material declares `parameter`
    pub fn has_parameter(&self, parameter: MaterialParameter) -> bool {
        self.parameters.contains(&parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_names() {
        let material = Material::new("flat").with_uniforms(["model_matrix", "tint", "light_pos"]);

        assert!(material.has_parameter(MaterialParameter::ModelMatrix));
        assert!(material.has_parameter(MaterialParameter::LightPosition));
        assert!(!material.has_parameter(MaterialParameter::ViewMatrix));
        assert_eq!(MaterialParameter::from_uniform_name("view_matrix"), Some(MaterialParameter::ViewMatrix));
    }

    #[test]
    fn test_lit_declares_everything() {
        let material = Material::lit("phong");
        assert!(MaterialParameter::ALL.iter().all(|p| material.has_parameter(*p)));
        assert_eq!(material.name(), "phong");
    }
}
