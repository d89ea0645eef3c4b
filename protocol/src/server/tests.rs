#[cfg(test)]
mod tests {
    use crate::{parse_server_message, HpStatus, Player, ServerMessage, Stat};

    #[test]
    fn test_parse_move() {
        let message =
            parse_server_message("|move|p1a: Garchomp|Earthquake|p2a: Dragapult|[miss]").unwrap();

        match message {
            ServerMessage::Move {
                pokemon,
                move_name,
                target,
                miss,
                still,
            } => {
                assert_eq!(pokemon.name, "Garchomp");
                assert_eq!(move_name, "Earthquake");
                assert_eq!(target.unwrap().player, Player::P2);
                assert!(miss);
                assert!(!still);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_switch_and_drag() {
        let switch = parse_server_message("|switch|p2a: Toxapex|Toxapex, F|100/100").unwrap();
        let drag = parse_server_message("|drag|p2a: Toxapex|Toxapex, F|100/100").unwrap();

        assert!(matches!(switch, ServerMessage::Switch { drag: false, .. }));
        assert!(matches!(drag, ServerMessage::Switch { drag: true, .. }));
    }

    #[test]
    fn test_parse_damage_with_source() {
        let message =
            parse_server_message("|-damage|p1a: Garchomp|88/100|[from] Stealth Rock").unwrap();

        assert_eq!(
            message,
            ServerMessage::Damage {
                pokemon: crate::PokemonIdent::parse("p1a: Garchomp").unwrap(),
                hp_status: Some(HpStatus {
                    current: 88,
                    max: Some(100),
                    status: None,
                }),
                from: Some("Stealth Rock".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_boost_family() {
        let unboost = parse_server_message("|-unboost|p2a: Dragapult|spe|1").unwrap();
        assert!(matches!(
            unboost,
            ServerMessage::Unboost {
                stat: Stat::Spe,
                amount: 1,
                ..
            }
        ));

        assert!(parse_server_message("|-boost|p2a: Dragapult|luck|1").is_err());
    }

    #[test]
    fn test_parse_request_with_pipes_in_json() {
        let message = parse_server_message(r#"|request|{"wait":true,"note":"a|b"}"#).unwrap();
        match message {
            ServerMessage::Request(value) => assert_eq!(value["note"], "a|b"),
            other => panic!("unexpected {:?}", other),
        }

        assert!(parse_server_message("|request|{not json").is_err());
        assert_eq!(
            parse_server_message("|request|").unwrap(),
            ServerMessage::Request(serde_json::Value::Null)
        );
    }

    #[test]
    fn test_parse_terminal() {
        assert_eq!(
            parse_server_message("|win|Alice").unwrap(),
            ServerMessage::Win("Alice".to_string())
        );
        assert!(parse_server_message("|tie").unwrap().is_terminal());
        assert!(!parse_server_message("|turn|3").unwrap().is_terminal());
    }

    #[test]
    fn test_parse_turn_invalid() {
        assert!(parse_server_message("|turn|").is_err());
        assert!(parse_server_message("|turn|abc").is_err());
    }

    #[test]
    fn test_parse_unknown_and_headers() {
        assert_eq!(
            parse_server_message("|someunknown|data").unwrap(),
            ServerMessage::Raw("|someunknown|data".to_string())
        );
        assert_eq!(
            parse_server_message("sideupdate").unwrap(),
            ServerMessage::Raw("sideupdate".to_string())
        );
        assert_eq!(
            parse_server_message("").unwrap(),
            ServerMessage::Raw(String::new())
        );
        assert_eq!(
            parse_server_message("|").unwrap(),
            ServerMessage::Raw("|".to_string())
        );
    }

    #[test]
    fn test_parse_side_condition() {
        let message = parse_server_message("|-sidestart|p2: Bob|move: Stealth Rock").unwrap();
        match message {
            ServerMessage::SideStart { side, condition } => {
                assert_eq!(side.player, Player::P2);
                assert_eq!(condition, "move: Stealth Rock");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_split() {
        assert_eq!(
            parse_server_message("|split|p1").unwrap(),
            ServerMessage::Split(Player::P1)
        );
    }
}
