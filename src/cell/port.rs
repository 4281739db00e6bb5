use std::fmt;

use itertools::Itertools;

use super::direction::Direction;

pub const K_OUTPUT_PORT: &str = "Y";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
}

impl Port {
    pub fn new(name: &str, direction: Direction) -> Self {
        Self {
            name: name.to_owned(),
            direction,
        }
    }

    pub fn is_output(&self) -> bool {
        self.name == K_OUTPUT_PORT
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.direction)
    }
}

// 회전이 적용된 게이트 하나의 배치
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variant {
    pub ports: Vec<Port>,
}

impl Variant {
    pub fn new(ports: Vec<Port>) -> Self {
        Self { ports }
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|port| port.name == name)
    }

    pub fn output(&self) -> Option<&Port> {
        self.ports.iter().find(|port| port.is_output())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.ports.iter().join(" "))
    }
}
