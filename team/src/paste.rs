//! Human-readable team paste
//!
//! ```text
//! Chompy (Garchomp) (F) @ Choice Scarf
//! Ability: Rough Skin
//! Tera Type: Steel
//! Level: 50
//! EVs: 252 Atk / 4 Def / 252 Spe
//! Jolly Nature
//! IVs: 0 SpA
//! - Earthquake
//! ```

use arena_battle::StatTable;

use crate::slot::{MAX_IV, MAX_LEVEL, TeamSlotData, display_species};

fn stat_list(stats: &StatTable, skip: u16) -> Option<String> {
    let parts: Vec<String> = stats
        .to_array()
        .iter()
        .zip(StatTable::NAMES)
        .filter(|(value, _)| **value != skip)
        .map(|(value, name)| format!("{value} {name}"))
        .collect();
    (!parts.is_empty()).then(|| parts.join(" / "))
}

fn slot_to_paste(slot: &TeamSlotData) -> String {
    let species = display_species(&slot.species);
    let mut header = match slot.nickname.as_deref().map(str::trim) {
        Some(nick) if !nick.is_empty() && nick != species => format!("{nick} ({species})"),
        _ => species,
    };
    if let Some(gender) = slot.gender {
        header.push_str(&format!(" ({gender})"));
    }
    if !slot.item.trim().is_empty() {
        header.push_str(&format!(" @ {}", slot.item.trim()));
    }

    let mut lines = vec![header];
    if !slot.ability.trim().is_empty() {
        lines.push(format!("Ability: {}", slot.ability.trim()));
    }
    if slot.shiny {
        lines.push("Shiny: Yes".to_string());
    }
    if let Some(tera) = slot.tera_type.as_deref().filter(|t| !t.trim().is_empty()) {
        lines.push(format!("Tera Type: {}", tera.trim()));
    }
    if slot.level != MAX_LEVEL {
        lines.push(format!("Level: {}", slot.level));
    }
    if let Some(evs) = stat_list(&slot.evs, 0) {
        lines.push(format!("EVs: {evs}"));
    }
    if !slot.nature.trim().is_empty() {
        lines.push(format!("{} Nature", slot.nature.trim()));
    }
    if let Some(ivs) = stat_list(&slot.ivs, MAX_IV) {
        lines.push(format!("IVs: {ivs}"));
    }
    lines.extend(slot.move_names().map(|m| format!("- {m}")));
    lines.join("\n")
}

/// Export a team as a paste, members separated by a blank line
pub fn team_to_showdown_paste(slots: &[TeamSlotData]) -> String {
    slots
        .iter()
        .map(slot_to_paste)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn parse_stat_line(spec: &str, stats: &mut StatTable) {
    for part in spec.split('/') {
        let mut words = part.split_whitespace();
        if let (Some(value), Some(name)) = (words.next(), words.next())
            && let Ok(value) = value.parse()
        {
            stats.set_named(name, value);
        }
    }
}

/// Parse a "Name (Species) (G) @ Item" header
fn parse_header(line: &str) -> TeamSlotData {
    let (names, item) = match line.rsplit_once(" @ ") {
        Some((names, item)) => (names.trim(), item.trim()),
        None => (line.trim(), ""),
    };

    let mut names = names.to_string();
    let mut gender = None;
    for (suffix, g) in [(" (M)", 'M'), (" (F)", 'F')] {
        if let Some(stripped) = names.strip_suffix(suffix) {
            gender = Some(g);
            names = stripped.to_string();
        }
    }

    let (nickname, species) = match (names.rfind(" ("), names.ends_with(')')) {
        (Some(open), true) => (
            Some(names[..open].trim().to_string()),
            names[open + 2..names.len() - 1].trim().to_string(),
        ),
        _ => (None, names.trim().to_string()),
    };

    let mut slot = TeamSlotData::new(species);
    slot.nickname = nickname;
    slot.item = item.to_string();
    slot.gender = gender;
    slot
}

/// Parse a paste back into team members
///
/// Unknown lines are ignored. Blocks without a header produce nothing.
pub fn parse_paste(text: &str) -> Vec<TeamSlotData> {
    let mut team = Vec::new();
    let mut current: Option<TeamSlotData> = None;
    let mut move_count = 0;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            team.extend(current.take());
            continue;
        }
        let Some(slot) = current.as_mut() else {
            if !line.starts_with('-') && !line.starts_with("===") {
                current = Some(parse_header(line));
                move_count = 0;
            }
            continue;
        };

        if let Some(mv) = line.strip_prefix('-') {
            if move_count < slot.moves.len() {
                slot.moves[move_count] = Some(mv.trim().to_string());
                move_count += 1;
            }
        } else if let Some(ability) = line.strip_prefix("Ability:") {
            slot.ability = ability.trim().to_string();
        } else if let Some(tera) = line.strip_prefix("Tera Type:") {
            slot.tera_type = Some(tera.trim().to_string());
        } else if let Some(level) = line.strip_prefix("Level:") {
            slot.level = level.trim().parse().unwrap_or(MAX_LEVEL);
        } else if let Some(shiny) = line.strip_prefix("Shiny:") {
            slot.shiny = shiny.trim().eq_ignore_ascii_case("yes");
        } else if let Some(evs) = line.strip_prefix("EVs:") {
            parse_stat_line(evs, &mut slot.evs);
        } else if let Some(ivs) = line.strip_prefix("IVs:") {
            parse_stat_line(ivs, &mut slot.ivs);
        } else if let Some(nature) = line.strip_suffix(" Nature") {
            slot.nature = nature.trim().to_string();
        }
    }
    team.extend(current);
    team
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TeamSlotData> {
        let mut chomp = TeamSlotData::new("garchomp").with_moves(&[
            "Earthquake",
            "Dragon Claw",
            "Swords Dance",
            "Stone Edge",
        ]);
        chomp.nickname = Some("Chompy".into());
        chomp.gender = Some('F');
        chomp.item = "Choice Scarf".into();
        chomp.ability = "Rough Skin".into();
        chomp.tera_type = Some("Steel".into());
        chomp.nature = "Jolly".into();
        chomp.evs = StatTable::from_array([0, 252, 4, 0, 0, 252]);
        chomp.ivs.spa = 0;
        chomp.level = 50;

        let mut pika = TeamSlotData::new("Pikachu").with_moves(&["Thunderbolt"]);
        pika.ability = "Static".into();
        pika.nature = "Timid".into();
        vec![chomp, pika]
    }

    #[test]
    fn test_paste_layout() {
        let paste = team_to_showdown_paste(&sample());
        let expected = "\
Chompy (Garchomp) (F) @ Choice Scarf
Ability: Rough Skin
Tera Type: Steel
Level: 50
EVs: 252 Atk / 4 Def / 252 Spe
Jolly Nature
IVs: 0 SpA
- Earthquake
- Dragon Claw
- Swords Dance
- Stone Edge

Pikachu
Ability: Static
Timid Nature
- Thunderbolt";
        assert_eq!(paste, expected);
    }

    #[test]
    fn test_paste_round_trips() {
        let team = sample();
        let parsed = parse_paste(&team_to_showdown_paste(&team));
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].species, "Garchomp");
        assert_eq!(parsed[0].nickname.as_deref(), Some("Chompy"));
        assert_eq!(parsed[0].gender, Some('F'));
        assert_eq!(parsed[0].evs, team[0].evs);
        assert_eq!(parsed[0].ivs, team[0].ivs);
        assert_eq!(parsed[0].level, 50);
        assert_eq!(parsed[0].moves, team[0].moves);
        assert_eq!(parsed[1], team[1]);
    }

    #[test]
    fn test_parse_tolerates_noise() {
        let text = "=== [gen9] Team ===\n\n\nGreat Tusk @ Leftovers  \nAbility: Protosynthesis\nShiny: Yes\n- Headlong Rush\n- Rapid Spin\n\n\n";
        let team = parse_paste(text);
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].species, "Great Tusk");
        assert_eq!(team[0].item, "Leftovers");
        assert!(team[0].shiny);
        assert_eq!(team[0].move_names().count(), 2);
        assert!(parse_paste("").is_empty());
    }
}
