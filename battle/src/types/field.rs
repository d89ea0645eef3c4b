//! Global field state

use arena_protocol::to_id;

use super::conditions::{Terrain, Weather};

/// Conditions affecting both sides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub trick_room: bool,
    pub magic_room: bool,
    pub wonder_room: bool,
    pub gravity: bool,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `-weather` line; "none" clears it
    pub fn set_weather(&mut self, weather: &str) {
        self.weather = Weather::from_protocol(weather);
    }

    /// Apply a `-fieldstart` condition
    pub fn start(&mut self, condition: &str) {
        if let Some(terrain) = Terrain::from_protocol(condition) {
            self.terrain = Some(terrain);
            return;
        }
        if let Some(flag) = self.room_mut(condition) {
            *flag = true;
        }
    }

    /// Apply a `-fieldend` condition
    pub fn end(&mut self, condition: &str) {
        if Terrain::from_protocol(condition).is_some() {
            self.terrain = None;
            return;
        }
        if let Some(flag) = self.room_mut(condition) {
            *flag = false;
        }
    }

    fn room_mut(&mut self, condition: &str) -> Option<&mut bool> {
        let clean = condition.strip_prefix("move: ").unwrap_or(condition);
        match to_id(clean).as_str() {
            "trickroom" => Some(&mut self.trick_room),
            "magicroom" => Some(&mut self.magic_room),
            "wonderroom" => Some(&mut self.wonder_room),
            "gravity" => Some(&mut self.gravity),
            _ => None,
        }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_start_and_end() {
        let mut field = FieldState::new();
        field.start("move: Electric Terrain");
        assert_eq!(field.terrain, Some(Terrain::Electric));

        field.start("Grassy Terrain");
        assert_eq!(field.terrain, Some(Terrain::Grassy));

        field.end("Grassy Terrain");
        assert!(field.terrain.is_none());
    }

    #[test]
    fn test_rooms() {
        let mut field = FieldState::new();
        field.start("move: Trick Room");
        field.start("Gravity");
        assert!(field.trick_room);
        assert!(field.gravity);

        field.end("move: Trick Room");
        assert!(!field.trick_room);
        assert!(!field.is_clear());

        field.start("Fairy Lock");
        field.end("Gravity");
        assert!(field.is_clear());
    }

    #[test]
    fn test_weather_none_clears() {
        let mut field = FieldState::new();
        field.set_weather("RainDance");
        assert_eq!(field.weather, Some(Weather::Rain));
        field.set_weather("none");
        assert!(field.weather.is_none());
    }
}
