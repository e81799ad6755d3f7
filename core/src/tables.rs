//! Fixed-capacity registries accumulated by the material builder.
//!
//! - [`ParameterTable`] - uniforms and samplers, append-only up to [`MAX_PARAMETERS_COUNT`]
//! - [`PropertySet`] - "property used" flags
//! - [`VariableTable`] - names of the custom interpolated variables

use matforge_shared::{PROPERTY_COUNT, Parameter, Property, VARIABLE_COUNT, Variable};

use crate::error::ConfigError;

/// Maximum number of parameters a material can declare
pub const MAX_PARAMETERS_COUNT: usize = 32;

/// Ordered table of declared parameters.
///
/// Inserting into a full table fails and leaves the table unchanged. The failure
/// is also remembered so that a later build reports it.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    entries: Vec<Parameter>,
    rejected: Vec<String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn insert(&mut self, parameter: Parameter) -> Result<(), ConfigError> {
        if self.entries.len() >= MAX_PARAMETERS_COUNT {
            let name = parameter.name().to_string();
            self.rejected.push(name.clone());
            return Err(ConfigError::ParameterCapacity {
                name,
                max: MAX_PARAMETERS_COUNT,
            });
        }
        self.entries.push(parameter);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_PARAMETERS_COUNT
    }

    /// Parameters in declaration order
    pub fn as_slice(&self) -> &[Parameter] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.iter().find(|p| p.name() == name)
    }

    pub fn has_external_sampler(&self) -> bool {
        self.entries.iter().any(Parameter::is_external_sampler)
    }

    /// Names of parameters that were rejected because the table was full
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Check the invariants a build relies on.
    ///
    /// Reports the first rejected insert, then empty names, invalid array sizes and
    /// duplicate names, in declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.rejected.first() {
            return Err(ConfigError::ParameterCapacity {
                name: name.clone(),
                max: MAX_PARAMETERS_COUNT,
            });
        }

        for (i, parameter) in self.entries.iter().enumerate() {
            let name = parameter.name();
            if name.is_empty() {
                return Err(ConfigError::EmptyParameterName);
            }
            if let Parameter::Uniform { size: 0, .. } = parameter {
                return Err(ConfigError::InvalidArraySize {
                    name: name.to_string(),
                    size: 0,
                });
            }
            if self.entries[..i].iter().any(|p| p.name() == name) {
                return Err(ConfigError::DuplicateParameter(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Which material properties the shading code writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertySet {
    used: [bool; PROPERTY_COUNT],
}

impl PropertySet {
    /// Mark a property as used (idempotent)
    pub fn set(&mut self, property: Property) {
        self.used[property.index()] = true;
    }

    pub fn contains(&self, property: Property) -> bool {
        self.used[property.index()]
    }

    /// Used properties in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        Property::ALL.into_iter().filter(|p| self.contains(*p))
    }

    /// One bit per property index
    pub fn bits(&self) -> u32 {
        self.iter().fold(0, |bits, p| bits | (1 << p.index()))
    }
}

/// Names assigned to the custom variable slots
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableTable {
    names: [Option<String>; VARIABLE_COUNT],
}

impl VariableTable {
    /// Name a variable slot, replacing any previous name
    pub fn set(&mut self, variable: Variable, name: impl Into<String>) {
        self.names[variable.index()] = Some(name.into());
    }

    pub fn get(&self, variable: Variable) -> Option<&str> {
        self.names[variable.index()].as_deref()
    }

    /// Assigned slots in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Variable, &str)> + '_ {
        Variable::ALL
            .into_iter()
            .filter_map(|v| self.get(v).map(|name| (v, name)))
    }

    pub fn to_vec(&self) -> Vec<Option<String>> {
        self.names.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matforge_shared::{Precision, SamplerFormat, SamplerType, UniformType};

    fn uniform(name: &str) -> Parameter {
        Parameter::uniform(name, UniformType::Float)
    }

    #[test]
    fn test_fill_to_capacity_then_overflow() {
        let mut table = ParameterTable::new();
        for i in 0..MAX_PARAMETERS_COUNT {
            table.insert(uniform(&format!("p{i}"))).unwrap();
        }
        assert!(table.is_full());

        let err = table.insert(uniform("overflow")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ParameterCapacity {
                name: "overflow".to_string(),
                max: MAX_PARAMETERS_COUNT
            }
        );
        assert_eq!(table.len(), MAX_PARAMETERS_COUNT);
        assert!(table.get("overflow").is_none());
        assert_eq!(table.rejected(), ["overflow".to_string()]);
        assert!(matches!(
            table.validate(),
            Err(ConfigError::ParameterCapacity { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_fail_validation() {
        let mut table = ParameterTable::new();
        table.insert(uniform("roughness")).unwrap();
        table
            .insert(Parameter::sampler(
                "roughness",
                SamplerType::Sampler2d,
                SamplerFormat::Float,
                Precision::Default,
            ))
            .unwrap();
        assert_eq!(
            table.validate(),
            Err(ConfigError::DuplicateParameter("roughness".to_string()))
        );
    }

    #[test]
    fn test_empty_name_and_zero_size_fail_validation() {
        let mut table = ParameterTable::new();
        table.insert(uniform("")).unwrap();
        assert_eq!(table.validate(), Err(ConfigError::EmptyParameterName));

        let mut table = ParameterTable::new();
        table
            .insert(Parameter::uniform_array("weights", UniformType::Float4, 0))
            .unwrap();
        assert!(matches!(
            table.validate(),
            Err(ConfigError::InvalidArraySize { size: 0, .. })
        ));
    }

    #[test]
    fn test_external_sampler_detection() {
        let mut table = ParameterTable::new();
        table.insert(uniform("tint")).unwrap();
        assert!(!table.has_external_sampler());
        table
            .insert(Parameter::sampler(
                "camera",
                SamplerType::SamplerExternal,
                SamplerFormat::Float,
                Precision::Default,
            ))
            .unwrap();
        assert!(table.has_external_sampler());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_property_set_is_idempotent() {
        let mut props = PropertySet::default();
        props.set(Property::Roughness);
        props.set(Property::Roughness);
        props.set(Property::BaseColor);
        assert!(props.contains(Property::Roughness));
        assert!(!props.contains(Property::Metallic));
        assert_eq!(
            props.iter().collect::<Vec<_>>(),
            [Property::BaseColor, Property::Roughness]
        );
        assert_eq!(props.bits(), 0b11);
    }

    #[test]
    fn test_variable_slots() {
        let mut vars = VariableTable::default();
        vars.set(Variable::Custom2, "eyeDirection");
        vars.set(Variable::Custom2, "viewDirection");
        assert_eq!(vars.get(Variable::Custom2), Some("viewDirection"));
        assert_eq!(vars.get(Variable::Custom0), None);
        assert_eq!(vars.iter().count(), 1);
        assert_eq!(vars.to_vec().len(), VARIABLE_COUNT);
    }
}
