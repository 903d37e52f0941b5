use serde::Deserialize;

use crate::data;

/// The ten ability rows, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ability {
	Strength,
	Speed,
	Intelligence,
	Alien,
	Healing,
	Armor,
	Weapon,
	Flight,
	Magic,
	AcquiredPower,
}

impl Ability {
	pub const ALL: [Ability; 10] = [
		Self::Strength,
		Self::Speed,
		Self::Intelligence,
		Self::Alien,
		Self::Healing,
		Self::Armor,
		Self::Weapon,
		Self::Flight,
		Self::Magic,
		Self::AcquiredPower,
	];

	/// Dataset column, also the sort field name.
	pub fn key(self) -> &'static str {
		match self {
			Self::Strength => "super_strength",
			Self::Speed => "super_speed",
			Self::Intelligence => "super_intelligence",
			Self::Alien => "alien",
			Self::Healing => "healing",
			Self::Armor => "armor",
			Self::Weapon => "weapon",
			Self::Flight => "flight",
			Self::Magic => "magic",
			Self::AcquiredPower => "acquired_power",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Strength => "Strength",
			Self::Speed => "Speed",
			Self::Intelligence => "Intelligence",
			Self::Alien => "Alien origin",
			Self::Healing => "Healing",
			Self::Armor => "Armor",
			Self::Weapon => "Weapon",
			Self::Flight => "Flight",
			Self::Magic => "Magic",
			Self::AcquiredPower => "Acquired power",
		}
	}

	pub fn icon_stem(self) -> &'static str {
		match self {
			Self::Strength => "strength",
			Self::Speed => "speed",
			Self::Intelligence => "brain",
			Self::Alien => "alien",
			Self::Healing => "heal",
			Self::Armor => "armor",
			Self::Weapon => "weapons",
			Self::Flight => "flight",
			Self::Magic => "magic",
			Self::AcquiredPower => "chemistry",
		}
	}

	pub fn index(self) -> usize {
		self as usize
	}

	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|a| a.key() == key)
	}
}

/// Numeric profile columns from the full character sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
	Durability,
	Energy,
	FightingSkills,
	Intelligence,
	Speed,
	Strength,
}

impl Stat {
	pub const ALL: [Stat; 6] = [
		Self::Durability,
		Self::Energy,
		Self::FightingSkills,
		Self::Intelligence,
		Self::Speed,
		Self::Strength,
	];

	pub fn key(self) -> &'static str {
		match self {
			Self::Durability => "durability",
			Self::Energy => "energy",
			Self::FightingSkills => "fighting_skills",
			Self::Intelligence => "intelligence",
			Self::Speed => "speed",
			Self::Strength => "strength",
		}
	}

	pub fn label(self) -> String {
		crate::config::title_case(self.key())
	}
}

/// A numeric column characters can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
	Power,
	Ability(Ability),
	Stat(Stat),
}

impl SortField {
	pub fn parse(name: &str) -> Option<Self> {
		if name == "power" {
			return Some(Self::Power);
		}
		Ability::from_key(name)
			.map(Self::Ability)
			.or_else(|| Stat::ALL.into_iter().find(|s| s.key() == name).map(Self::Stat))
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Power => "power",
			Self::Ability(a) => a.key(),
			Self::Stat(s) => s.key(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Stats {
	#[serde(deserialize_with = "data::optional_number")]
	pub durability: Option<f64>,
	#[serde(deserialize_with = "data::optional_number")]
	pub energy: Option<f64>,
	#[serde(deserialize_with = "data::optional_number")]
	pub fighting_skills: Option<f64>,
	#[serde(deserialize_with = "data::optional_number")]
	pub intelligence: Option<f64>,
	#[serde(deserialize_with = "data::optional_number")]
	pub speed: Option<f64>,
	#[serde(deserialize_with = "data::optional_number")]
	pub strength: Option<f64>,
}

impl Stats {
	pub fn get(&self, stat: Stat) -> Option<f64> {
		match stat {
			Stat::Durability => self.durability,
			Stat::Energy => self.energy,
			Stat::FightingSkills => self.fighting_skills,
			Stat::Intelligence => self.intelligence,
			Stat::Speed => self.speed,
			Stat::Strength => self.strength,
		}
	}
}

#[derive(Deserialize)]
struct RawCharacter {
	name: String,
	#[serde(default, deserialize_with = "data::flag")]
	super_strength: bool,
	#[serde(default, deserialize_with = "data::flag")]
	super_speed: bool,
	#[serde(default, deserialize_with = "data::flag")]
	super_intelligence: bool,
	#[serde(default, deserialize_with = "data::flag")]
	alien: bool,
	#[serde(default, deserialize_with = "data::flag")]
	healing: bool,
	#[serde(default, deserialize_with = "data::flag")]
	armor: bool,
	#[serde(default, deserialize_with = "data::flag")]
	weapon: bool,
	#[serde(default, deserialize_with = "data::flag")]
	flight: bool,
	#[serde(default, deserialize_with = "data::flag")]
	magic: bool,
	#[serde(default, deserialize_with = "data::flag")]
	acquired_power: bool,
	#[serde(default = "nan", deserialize_with = "data::number")]
	power: f64,
	#[serde(flatten)]
	stats: Stats,
}

fn nan() -> f64 {
	f64::NAN
}

/// One column of the matrix.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawCharacter")]
pub struct CharacterRecord {
	pub name: String,
	pub abilities: [bool; 10],
	pub power: f64,
	pub stats: Stats,
}

impl From<RawCharacter> for CharacterRecord {
	fn from(raw: RawCharacter) -> Self {
		Self {
			name: raw.name,
			abilities: [
				raw.super_strength,
				raw.super_speed,
				raw.super_intelligence,
				raw.alien,
				raw.healing,
				raw.armor,
				raw.weapon,
				raw.flight,
				raw.magic,
				raw.acquired_power,
			],
			power: raw.power,
			stats: raw.stats,
		}
	}
}

impl CharacterRecord {
	pub fn has(&self, ability: Ability) -> bool {
		self.abilities[ability.index()]
	}

	/// Value of a sort column; `NaN` when the record lacks it.
	pub fn value(&self, field: SortField) -> f64 {
		match field {
			SortField::Power => self.power,
			SortField::Ability(a) => f64::from(u8::from(self.has(a))),
			SortField::Stat(s) => self.stats.get(s).unwrap_or(f64::NAN),
		}
	}
}
