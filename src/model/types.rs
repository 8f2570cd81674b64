use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    Drift,
    Marker,
    Monitor,
    Collimator,
    SBend,
    RBend,
    DipoleEdge,
    Quadrupole,
    Sextupole,
    Octupole,
    Multipole,
    ThinMultipole,
    Solenoid,
    ThinSolenoid,
    RfCavity,
    HKicker,
    VKicker,
    Kicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApertureType {
    #[default]
    Circle,
    Ellipse,
    Rectangle,
    RectEllipse,
    RectCircle,
    Racetrack,
    Octagon,
    LhcScreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeSide {
    #[default]
    Entrance,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    Start,
    #[default]
    Centre,
    End,
}

impl ElementClass {
    pub const ALL: [ElementClass; 18] = [
        ElementClass::Drift,
        ElementClass::Marker,
        ElementClass::Monitor,
        ElementClass::Collimator,
        ElementClass::SBend,
        ElementClass::RBend,
        ElementClass::DipoleEdge,
        ElementClass::Quadrupole,
        ElementClass::Sextupole,
        ElementClass::Octupole,
        ElementClass::Multipole,
        ElementClass::ThinMultipole,
        ElementClass::Solenoid,
        ElementClass::ThinSolenoid,
        ElementClass::RfCavity,
        ElementClass::HKicker,
        ElementClass::VKicker,
        ElementClass::Kicker,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ElementClass::Drift => "Drift",
            ElementClass::Marker => "Marker",
            ElementClass::Monitor => "Monitor",
            ElementClass::Collimator => "Collimator",
            ElementClass::SBend => "SBend",
            ElementClass::RBend => "RBend",
            ElementClass::DipoleEdge => "DipoleEdge",
            ElementClass::Quadrupole => "Quadrupole",
            ElementClass::Sextupole => "Sextupole",
            ElementClass::Octupole => "Octupole",
            ElementClass::Multipole => "Multipole",
            ElementClass::ThinMultipole => "ThinMultipole",
            ElementClass::Solenoid => "Solenoid",
            ElementClass::ThinSolenoid => "ThinSolenoid",
            ElementClass::RfCavity => "RFCavity",
            ElementClass::HKicker => "HKicker",
            ElementClass::VKicker => "VKicker",
            ElementClass::Kicker => "Kicker",
        }
    }

    pub fn is_magnet(&self) -> bool {
        matches!(
            self,
            ElementClass::SBend
                | ElementClass::RBend
                | ElementClass::DipoleEdge
                | ElementClass::Quadrupole
                | ElementClass::Sextupole
                | ElementClass::Octupole
                | ElementClass::Multipole
                | ElementClass::ThinMultipole
                | ElementClass::Solenoid
                | ElementClass::ThinSolenoid
                | ElementClass::HKicker
                | ElementClass::VKicker
                | ElementClass::Kicker
        )
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ElementClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ElementClass::ALL
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Invalid element class: {}", s))
    }
}

impl ApertureType {
    pub fn name(&self) -> &'static str {
        match self {
            ApertureType::Circle => "circle",
            ApertureType::Ellipse => "ellipse",
            ApertureType::Rectangle => "rectangle",
            ApertureType::RectEllipse => "rectellipse",
            ApertureType::RectCircle => "rectcircle",
            ApertureType::Racetrack => "racetrack",
            ApertureType::Octagon => "octagon",
            ApertureType::LhcScreen => "lhcscreen",
        }
    }
}

impl fmt::Display for ApertureType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ApertureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(ApertureType::Circle),
            "ellipse" => Ok(ApertureType::Ellipse),
            "rectangle" => Ok(ApertureType::Rectangle),
            "rectellipse" => Ok(ApertureType::RectEllipse),
            "rectcircle" => Ok(ApertureType::RectCircle),
            "racetrack" => Ok(ApertureType::Racetrack),
            "octagon" => Ok(ApertureType::Octagon),
            "lhcscreen" => Ok(ApertureType::LhcScreen),
            _ => Err(format!("Invalid aperture type: {}", s)),
        }
    }
}

impl EdgeSide {
    pub fn name(&self) -> &'static str {
        match self {
            EdgeSide::Entrance => "entrance",
            EdgeSide::Exit => "exit",
        }
    }
}

impl fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EdgeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrance" => Ok(EdgeSide::Entrance),
            "exit" => Ok(EdgeSide::Exit),
            _ => Err(format!(
                "Invalid dipole edge side: {} (expected 'entrance' or 'exit')",
                s
            )),
        }
    }
}

impl Anchor {
    pub fn name(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Centre => "centre",
            Anchor::End => "end",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Anchor::Start),
            "centre" | "center" => Ok(Anchor::Centre),
            "end" => Ok(Anchor::End),
            _ => Err(format!("Invalid position anchor: {}", s)),
        }
    }
}
