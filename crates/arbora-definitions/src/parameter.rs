// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-parameter assignments applied to a labelled cable type.

use std::fmt;
use std::str::FromStr;

use crate::records::MechId;
use crate::types::DefinitionError;

/// Cable property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CableProperty {
    /// Axial resistivity in ohm*cm
    Ra,
    /// Membrane capacitance in uF/cm^2
    Cm,
}

impl CableProperty {
    pub const ALL: [CableProperty; 2] = [CableProperty::Ra, CableProperty::Cm];

    pub fn name(&self) -> &'static str {
        match self {
            CableProperty::Ra => "Ra",
            CableProperty::Cm => "cm",
        }
    }
}

impl fmt::Display for CableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CableProperty {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CableProperty::ALL
            .into_iter()
            .find(|property| property.name() == s)
            .ok_or_else(|| {
                DefinitionError::ModelDefinition(format!("'{}' is not a cable property.", s))
            })
    }
}

/// Ion property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonProperty {
    /// Reversal potential in mV
    RevPot,
    /// Internal concentration in mM
    IntCon,
    /// External concentration in mM
    ExtCon,
}

impl IonProperty {
    pub const ALL: [IonProperty; 3] = [IonProperty::RevPot, IonProperty::IntCon, IonProperty::ExtCon];

    pub fn name(&self) -> &'static str {
        match self {
            IonProperty::RevPot => "rev_pot",
            IonProperty::IntCon => "int_con",
            IonProperty::ExtCon => "ext_con",
        }
    }
}

impl fmt::Display for IonProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IonProperty {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IonProperty::ALL
            .into_iter()
            .find(|property| property.name() == s)
            .ok_or_else(|| {
                DefinitionError::ModelDefinition(format!("'{}' is not an ion property.", s))
            })
    }
}

/// One parameter value to set on a cable type.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter<V = f64> {
    Cable {
        property: CableProperty,
        value: V,
    },
    Ion {
        ion: String,
        property: IonProperty,
        value: V,
    },
    Mechanism {
        mech_id: MechId,
        parameter: String,
        value: V,
    },
}

impl<V> Parameter<V> {
    pub fn cable(property: CableProperty, value: V) -> Self {
        Parameter::Cable { property, value }
    }

    pub fn ion(ion: impl Into<String>, property: IonProperty, value: V) -> Self {
        Parameter::Ion {
            ion: ion.into(),
            property,
            value,
        }
    }

    pub fn mechanism(mech_id: MechId, parameter: impl Into<String>, value: V) -> Self {
        Parameter::Mechanism {
            mech_id,
            parameter: parameter.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_roundtrip() {
        for property in CableProperty::ALL {
            assert_eq!(property.name().parse::<CableProperty>().unwrap(), property);
        }
        for property in IonProperty::ALL {
            assert_eq!(property.name().parse::<IonProperty>().unwrap(), property);
        }
        assert!("ra".parse::<CableProperty>().is_err());
        assert!("rev".parse::<IonProperty>().is_err());
    }
}
