//! Species table

use crate::types::{StatTable, Type};

/// Base data for one species
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub name: &'static str,
    pub types: &'static [Type],
    pub base_stats: StatTable,
}

const fn entry(name: &'static str, types: &'static [Type], base: [u16; 6]) -> SpeciesData {
    SpeciesData {
        name,
        types,
        base_stats: StatTable::from_array(base),
    }
}

use Type::*;

#[rustfmt::skip]
pub(super) static SPECIES: &[SpeciesData] = &[
    entry("Garchomp", &[Dragon, Ground], [108, 130, 95, 80, 85, 102]),
    entry("Dragapult", &[Dragon, Ghost], [88, 120, 75, 100, 75, 142]),
    entry("Gholdengo", &[Steel, Ghost], [87, 60, 95, 133, 91, 84]),
    entry("Great Tusk", &[Ground, Fighting], [115, 131, 131, 53, 53, 87]),
    entry("Kingambit", &[Dark, Steel], [100, 135, 120, 60, 85, 50]),
    entry("Iron Valiant", &[Fairy, Fighting], [74, 130, 90, 120, 60, 116]),
    entry("Toxapex", &[Poison, Water], [50, 63, 152, 53, 142, 35]),
    entry("Corviknight", &[Flying, Steel], [98, 87, 105, 53, 85, 67]),
    entry("Landorus-Therian", &[Ground, Flying], [89, 145, 90, 105, 80, 91]),
    entry("Heatran", &[Fire, Steel], [91, 90, 106, 130, 106, 77]),
    entry("Ferrothorn", &[Grass, Steel], [74, 94, 131, 54, 116, 20]),
    entry("Rotom-Wash", &[Electric, Water], [50, 65, 107, 105, 107, 86]),
    entry("Clefable", &[Fairy], [95, 70, 73, 95, 90, 60]),
    entry("Dragonite", &[Dragon, Flying], [91, 134, 95, 100, 100, 80]),
    entry("Volcarona", &[Bug, Fire], [85, 60, 65, 135, 105, 100]),
    entry("Skarmory", &[Steel, Flying], [65, 80, 140, 40, 70, 70]),
    entry("Blissey", &[Normal], [255, 10, 10, 75, 135, 55]),
    entry("Tyranitar", &[Rock, Dark], [100, 134, 110, 95, 100, 61]),
    entry("Excadrill", &[Ground, Steel], [110, 135, 60, 50, 65, 88]),
    entry("Gengar", &[Ghost, Poison], [60, 65, 60, 130, 75, 110]),
    entry("Pikachu", &[Electric], [35, 55, 40, 50, 50, 90]),
    entry("Charizard", &[Fire, Flying], [78, 84, 78, 109, 85, 100]),
    entry("Blastoise", &[Water], [79, 83, 100, 85, 105, 78]),
    entry("Venusaur", &[Grass, Poison], [80, 82, 83, 100, 100, 80]),
    entry("Snorlax", &[Normal], [160, 110, 65, 65, 110, 30]),
    entry("Gyarados", &[Water, Flying], [95, 125, 79, 60, 100, 81]),
    entry("Lucario", &[Fighting, Steel], [70, 110, 70, 115, 70, 90]),
    entry("Scizor", &[Bug, Steel], [70, 130, 100, 55, 80, 65]),
    entry("Metagross", &[Steel, Psychic], [80, 135, 130, 95, 90, 70]),
    entry("Salamence", &[Dragon, Flying], [95, 135, 80, 110, 80, 100]),
    entry("Azumarill", &[Water, Fairy], [100, 50, 80, 60, 80, 50]),
    entry("Gardevoir", &[Psychic, Fairy], [68, 65, 65, 125, 115, 80]),
    entry("Weavile", &[Dark, Ice], [70, 120, 65, 45, 85, 125]),
    entry("Hippowdon", &[Ground], [108, 112, 118, 68, 72, 47]),
    entry("Amoonguss", &[Grass, Poison], [114, 85, 70, 85, 80, 30]),
    entry("Ting-Lu", &[Dark, Ground], [155, 110, 125, 55, 80, 45]),
    entry("Slowking", &[Water, Psychic], [95, 75, 80, 100, 110, 30]),
    entry("Mimikyu", &[Ghost, Fairy], [55, 90, 80, 50, 105, 96]),
    entry("Alakazam", &[Psychic], [55, 50, 45, 135, 95, 120]),
    entry("Machamp", &[Fighting], [90, 130, 80, 65, 85, 55]),
    entry("Jolteon", &[Electric], [65, 65, 60, 110, 95, 130]),
    entry("Vaporeon", &[Water], [130, 65, 60, 110, 95, 65]),
    entry("Magikarp", &[Water], [20, 10, 55, 15, 20, 80]),
    entry("Rillaboom", &[Grass], [100, 125, 90, 60, 70, 85]),
    entry("Cinderace", &[Fire], [80, 116, 75, 65, 75, 119]),
    entry("Greninja", &[Water, Dark], [72, 95, 67, 103, 71, 122]),
];
