//! Static policy data: law modifier table, country starting conditions,
//! and the demo site tables.
//!
//! Values reproduce HOI4 1.4.x (hoi4wiki). Laws are looked up by name;
//! adding a new law is a matter of appending a table row — unknown
//! categories are fine as long as at most one law per category is active.

use crate::calendar::Date;
use crate::orders::ObjectType;
use crate::site::{ConstructionSite, COUNTRY_UNDEFINED};
use serde::{Deserialize, Serialize};

/// Day 0 of every simulation; day 1 is 1936-01-01.
pub const GAME_START: Date = Date {
    year: 1935,
    month: 12,
    day: 31,
};

/// Forced end date when the caller does not supply one.
pub const DEFAULT_END_DATE: Date = Date {
    year: 1945,
    month: 1,
    day: 1,
};

/// Law slot. At most one law per category is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawCategory {
    Army,
    Trade,
    Economy,
    Technology,
    CivilianAdvisor,
    MilitaryAdvisor,
}

/// Static definition of one law: construction-speed modifiers per object
/// type, plus the consumer-goods penalty for economy laws.
#[derive(Debug, Clone, PartialEq)]
pub struct LawDef {
    pub name: &'static str,
    pub category: LawCategory,
    pub infrastructure: f64,
    pub civilian: f64,
    pub military: f64,
    /// Fraction of factories reserved for consumer goods. Economy laws only.
    pub consumer_goods_penalty: Option<f64>,
}

impl LawDef {
    pub fn modifier(&self, object: ObjectType) -> f64 {
        match object {
            ObjectType::Infrastructure => self.infrastructure,
            ObjectType::CivilianFactory => self.civilian,
            ObjectType::MilitaryFactory => self.military,
        }
    }
}

const fn law(
    name: &'static str,
    category: LawCategory,
    infrastructure: f64,
    civilian: f64,
    military: f64,
) -> LawDef {
    LawDef {
        name,
        category,
        infrastructure,
        civilian,
        military,
        consumer_goods_penalty: None,
    }
}

const fn economy_law(name: &'static str, civilian: f64, military: f64, penalty: f64) -> LawDef {
    LawDef {
        name,
        category: LawCategory::Economy,
        infrastructure: 0.0,
        civilian,
        military,
        consumer_goods_penalty: Some(penalty),
    }
}

pub static LAWS: [LawDef; 29] = [
    // Conscription laws
    law("disarmed_nation", LawCategory::Army, 0.0, 0.0, 0.0),
    law("volunteer_only", LawCategory::Army, 0.0, 0.0, 0.0),
    law("limited_conscription", LawCategory::Army, 0.0, 0.0, 0.0),
    law("extensive_conscription", LawCategory::Army, 0.0, 0.0, 0.0),
    law("service_by_requirement", LawCategory::Army, -0.1, -0.1, -0.1),
    law("all_adults_serve", LawCategory::Army, -0.3, -0.3, -0.3),
    law("scraped_the_barrel", LawCategory::Army, -0.4, -0.4, -0.4),
    // Trade laws
    law("free_trade", LawCategory::Trade, 0.15, 0.15, 0.15),
    law("export_focus", LawCategory::Trade, 0.1, 0.1, 0.1),
    law("limited_exports", LawCategory::Trade, 0.05, 0.05, 0.05),
    law("closed_economy", LawCategory::Trade, 0.0, 0.0, 0.0),
    // Economy laws (carry the consumer-goods penalty)
    economy_law("undisturbed_isolation", -0.5, -0.5, 0.4),
    economy_law("isolation", -0.4, -0.4, 0.35),
    economy_law("civilian_economy", -0.3, -0.3, 0.3),
    economy_law("early_mobilization", -0.1, -0.1, 0.25),
    economy_law("partial_mobilization", 0.0, 0.1, 0.2),
    economy_law("war_economy", 0.0, 0.2, 0.15),
    economy_law("total_mobilization", 0.0, 0.3, 0.1),
    // Construction technology
    law("construction_1", LawCategory::Technology, 0.1, 0.1, 0.1),
    law("construction_2", LawCategory::Technology, 0.2, 0.2, 0.2),
    law("construction_3", LawCategory::Technology, 0.3, 0.3, 0.3),
    law("construction_4", LawCategory::Technology, 0.4, 0.4, 0.4),
    law("construction_5", LawCategory::Technology, 0.5, 0.5, 0.5),
    // Advisors; the "_dismissed" rows model firing one
    law("captain_of_industry", LawCategory::CivilianAdvisor, 0.1, 0.1, 0.0),
    law("captain_of_industry_dismissed", LawCategory::CivilianAdvisor, 0.0, 0.0, 0.0),
    law("war_industrialist", LawCategory::MilitaryAdvisor, 0.0, 0.0, 0.1),
    law("war_industrialist_dismissed", LawCategory::MilitaryAdvisor, 0.0, 0.0, 0.0),
    // 1.4-era national spirits used by the examples
    law("new_deal", LawCategory::Technology, 0.2, 0.0, 0.0),
    law("new_deal_removed", LawCategory::Technology, 0.0, 0.0, 0.0),
];

pub fn find_law(name: &str) -> Option<&'static LawDef> {
    LAWS.iter().find(|l| l.name == name)
}

/// 1936-01-01 starting setup of a playable major.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryConditions {
    pub tag: &'static str,
    pub civilian: u32,
    pub military: u32,
    pub starting_laws: [&'static str; 3],
}

pub static COUNTRIES: [CountryConditions; 7] = [
    CountryConditions {
        tag: "SOV",
        civilian: 42,
        military: 36,
        starting_laws: ["volunteer_only", "export_focus", "civilian_economy"],
    },
    CountryConditions {
        tag: "GER",
        civilian: 31,
        military: 40,
        starting_laws: ["limited_conscription", "limited_exports", "partial_mobilization"],
    },
    CountryConditions {
        tag: "ITA",
        civilian: 20,
        military: 19,
        starting_laws: ["limited_conscription", "limited_exports", "partial_mobilization"],
    },
    CountryConditions {
        tag: "JAP",
        civilian: 23,
        military: 20,
        starting_laws: ["limited_conscription", "limited_exports", "partial_mobilization"],
    },
    CountryConditions {
        tag: "FRA",
        civilian: 35,
        military: 6,
        starting_laws: ["limited_conscription", "export_focus", "civilian_economy"],
    },
    CountryConditions {
        tag: "USA",
        civilian: 128,
        military: 10,
        starting_laws: ["disarmed_nation", "free_trade", "undisturbed_isolation"],
    },
    CountryConditions {
        tag: "ENG",
        civilian: 33,
        military: 14,
        starting_laws: ["volunteer_only", "export_focus", "civilian_economy"],
    },
];

pub fn find_country(tag: &str) -> Option<&'static CountryConditions> {
    COUNTRIES.iter().find(|c| c.tag == tag)
}

/// Small site table used by the hand-authored build-order demo.
pub fn demo_sites() -> Vec<ConstructionSite> {
    [
        ("Moscow", 8, Some(5), "SOV"),
        ("Kharkov", 7, Some(5), COUNTRY_UNDEFINED),
        ("Stalingrad", 7, None, COUNTRY_UNDEFINED),
    ]
    .into_iter()
    .filter_map(|(name, level, slots, country)| {
        ConstructionSite::new(name, level, slots, country).ok()
    })
    .collect()
}

/// German states in early 1937 (concentrated-industry level 2 slot counts),
/// used to demo the infrastructure-payback verdicts.
pub fn german_regions() -> Vec<ConstructionSite> {
    [
        ("Niederbayern", 6, 8),
        ("Oberbayern", 7, 4),
        ("Wuerttemberg", 8, 3),
        ("Franken", 7, 5),
        ("Hessen", 7, 7),
        ("Moselland", 7, 11),
        ("Rheinland", 8, 8),
        ("Westfalen", 8, 6),
        ("Weser-Ems", 6, 4),
        ("Sachsen", 7, 4),
        ("Thueringen", 6, 9),
        ("Hannover", 7, 6),
        ("Brandenburg", 8, 5),
        ("Mecklenburg", 6, 2),
        ("Schleswig", 6, 3),
        ("Oberschlesien", 6, 8),
        ("Niederschlesien", 6, 9),
        ("Ostmark", 6, 7),
        ("Pommern", 6, 4),
        ("Vorpommern", 6, 5),
        ("Ostpreussen", 6, 9),
    ]
    .into_iter()
    .filter_map(|(name, level, slots)| ConstructionSite::new(name, level, Some(slots), "GER").ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_law() {
        let law = find_law("war_economy").unwrap();
        assert_eq!(law.category, LawCategory::Economy);
        assert_eq!(law.modifier(ObjectType::MilitaryFactory), 0.2);
        assert_eq!(law.consumer_goods_penalty, Some(0.15));

        assert!(find_law("five_year_plan").is_none());
    }

    #[test]
    fn test_only_economy_laws_carry_penalties() {
        for law in &LAWS {
            assert_eq!(
                law.consumer_goods_penalty.is_some(),
                law.category == LawCategory::Economy,
                "law {}",
                law.name
            );
        }
    }

    #[test]
    fn test_country_starting_laws_resolve() {
        for country in &COUNTRIES {
            for name in country.starting_laws {
                let law = find_law(name)
                    .unwrap_or_else(|| panic!("{}: unknown starting law {name}", country.tag));
                assert!(law.consumer_goods_penalty.is_none() || law.category == LawCategory::Economy);
            }
            // Every major starts with exactly one economy law
            let economy = country
                .starting_laws
                .iter()
                .filter(|n| find_law(n).map(|l| l.category) == Some(LawCategory::Economy))
                .count();
            assert_eq!(economy, 1, "{}", country.tag);
        }
    }

    #[test]
    fn test_demo_tables() {
        assert_eq!(demo_sites().len(), 3);
        let regions = german_regions();
        assert_eq!(regions.len(), 21);
        assert!(regions.iter().all(|s| s.country() == "GER"));
    }
}
