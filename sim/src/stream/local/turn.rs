//! Turn resolution for the local engine

use rand::Rng;

use arena_battle::dex::{MoveData, MoveEffect};
use arena_battle::query::{DamageContext, hit_damage};
use arena_battle::{Player, SideCondition, Stat, StatStages, Status, Type};

use super::mon::{Side, stat_id, struggle};
use super::{Decision, LocalEngine, Pending};

const CRIT_CHANCE: f64 = 1.0 / 24.0;

/// Turns a screen or weather lasts
const FIELD_TURNS: u8 = 5;

fn fraction_of(max_hp: u32, fraction: f32) -> u32 {
    ((max_hp as f32 * fraction).floor() as u32).max(1)
}

impl LocalEngine {
    fn side(&self, player: Player) -> &Side {
        &self.sides[player.index()]
    }

    fn side_mut(&mut self, player: Player) -> &mut Side {
        &mut self.sides[player.index()]
    }

    pub(super) fn run_turn(&mut self, decisions: [Option<Decision>; 2]) {
        let was_protected = Player::BOTH.map(|p| self.side(p).active().protected_last);
        for side in &mut self.sides {
            side.active_mut().protected_last = false;
        }

        // Switches go first, faster side first
        let mut switches: Vec<(Player, usize)> = Player::BOTH
            .into_iter()
            .zip(&decisions)
            .filter_map(|(p, d)| match d {
                Some(Decision::Switch(slot)) => Some((p, *slot)),
                _ => None,
            })
            .collect();
        switches.sort_by(|a, b| {
            let speed = |p: Player| self.side(p).active().speed();
            speed(b.0).total_cmp(&speed(a.0))
        });
        for (player, slot) in switches {
            self.switch_in(player, slot);
        }

        let mut movers: Vec<(Player, usize, (i8, f32, f32))> = Vec::new();
        for (player, decision) in Player::BOTH.into_iter().zip(&decisions) {
            let Some(Decision::Move { slot, tera }) = *decision else {
                continue;
            };
            if tera {
                self.terastallize(player);
            }
            let side = self.side(player);
            let priority = Self::move_at(side, slot).priority;
            let speed = side.active().speed();
            movers.push((player, slot, (priority, speed, self.rng.r#gen::<f32>())));
        }
        movers.sort_by(|a, b| {
            b.2.0
                .cmp(&a.2.0)
                .then(b.2.1.total_cmp(&a.2.1))
                .then(b.2.2.total_cmp(&a.2.2))
        });

        let mut protected = [false; 2];
        for (player, slot, _) in movers {
            if self.side(player).active().is_fainted() {
                continue;
            }
            self.use_move(player, slot, was_protected[player.index()], &mut protected);
        }

        self.residual();
        self.end_of_turn(true);
    }

    pub(super) fn run_replacements(&mut self, decisions: [Option<Decision>; 2]) {
        for (player, decision) in Player::BOTH.into_iter().zip(decisions) {
            if let Some(Decision::Switch(slot)) = decision {
                self.switch_in(player, slot);
            }
        }
        self.end_of_turn(false);
    }

    /// Decide between a win, a tie, replacements or the next turn
    fn end_of_turn(&mut self, upkeep: bool) {
        let out = Player::BOTH.map(|p| self.side(p).all_fainted());
        match out {
            [true, true] => {
                self.emit("|tie");
                self.finish();
                return;
            }
            [true, false] | [false, true] => {
                let winner = if out[0] { Player::P2 } else { Player::P1 };
                let name = self.side(winner).name.clone();
                self.emit(format!("|win|{name}"));
                self.finish();
                return;
            }
            [false, false] => {}
        }
        if self.turn >= self.config.max_turns {
            self.emit("|tie");
            self.finish();
            return;
        }

        if upkeep {
            self.emit("|upkeep");
        }
        let needs = Player::BOTH.map(|p| {
            let side = self.side(p);
            side.active().is_fainted() && side.has_replacement()
        });
        if needs.contains(&true) {
            self.pending = needs.map(|need| if need { Pending::Switch } else { Pending::Nothing });
        } else {
            self.turn += 1;
            self.emit(format!("|turn|{}", self.turn));
            self.pending = [Pending::Move; 2];
        }
        self.flush();
        self.send_requests();
    }

    fn move_at(side: &Side, slot: usize) -> &'static MoveData {
        let mon = side.active();
        if mon.is_struggling() {
            return struggle();
        }
        mon.moves.get(slot - 1).map_or_else(struggle, |m| m.data)
    }

    fn terastallize(&mut self, player: Player) {
        let side = self.side_mut(player);
        let Some(tera) = side.active().tera_type else {
            return;
        };
        side.tera_used = true;
        side.active_mut().terastallized = true;
        let line = format!("|-terastallize|{}|{}", side.active_ident(), tera.as_str());
        self.emit(line);
    }

    fn switch_in(&mut self, player: Player, slot: usize) {
        let side = self.side_mut(player);
        if !side.can_switch_to(slot) {
            return;
        }
        side.active_mut().switch_out();
        side.team.swap(0, slot - 1);
        let ident = side.active_ident();
        let line = format!("|switch|{ident}|{}|{}", side.active().details(), side.active().condition());
        self.emit(line);
        self.entry_hazards(player);
        self.announce_faint(player);
    }

    fn entry_hazards(&mut self, player: Player) {
        let mut lines = Vec::new();
        let side = self.side_mut(player);
        let ident = side.active_ident();
        let side_ident = side.ident();
        let mut hazards: Vec<(SideCondition, u8)> = side.hazards.iter().map(|(h, l)| (*h, *l)).collect();
        hazards.sort_by_key(|(hazard, _)| hazard.to_string());
        let types = side.active().types();
        let grounded = !types.contains(&Type::Flying);
        let mut absorbed = false;

        for (hazard, layers) in hazards {
            let mon = side.active_mut();
            if mon.is_fainted() {
                break;
            }
            match hazard {
                SideCondition::StealthRock | SideCondition::Spikes => {
                    let fraction = hazard.entry_damage(layers, &types);
                    if fraction > 0.0 {
                        mon.damage(fraction_of(mon.max_hp, fraction));
                        lines.push(format!("|-damage|{ident}|{}|[from] {hazard}", mon.condition()));
                    }
                }
                SideCondition::ToxicSpikes if grounded => {
                    if types.contains(&Type::Poison) {
                        absorbed = true;
                        lines.push(format!("|-sideend|{side_ident}|move: {hazard}|[of] {ident}"));
                    } else {
                        let status = if layers >= 2 { Status::Toxic } else { Status::Poison };
                        if mon.can_take_status(status) {
                            mon.status = Some(status);
                            lines.push(format!("|-status|{ident}|{}", status.to_protocol()));
                        }
                    }
                }
                SideCondition::StickyWeb if grounded => {
                    lines.push(format!("|-activate|{ident}|move: {hazard}"));
                    if mon.boosts.boost(Stat::Spe, -1) != 0 {
                        lines.push(format!("|-unboost|{ident}|spe|1"));
                    }
                }
                _ => {}
            }
        }
        if absorbed {
            side.hazards.remove(&SideCondition::ToxicSpikes);
        }
        self.chunk.extend(lines);
    }

    /// Emit `|faint|` if the active pokemon has just hit 0 HP
    fn announce_faint(&mut self, player: Player) {
        let side = self.side(player);
        if side.active().is_fainted() {
            let line = format!("|faint|{}", side.active_ident());
            if !self.chunk.contains(&line) {
                self.emit(line);
            }
        }
    }

    /// Whether a status keeps the user from moving; may also cure it
    fn immobilized(&mut self, player: Player) -> bool {
        let roll: f64 = self.rng.r#gen();
        let side = self.side_mut(player);
        let ident = side.active_ident();
        let mon = side.active_mut();
        let (line, stuck) = match mon.status {
            Some(Status::Paralysis) if roll < 0.25 => (format!("|cant|{ident}|par"), true),
            Some(status @ (Status::Sleep | Status::Freeze)) => {
                let cure = if status == Status::Sleep { 1.0 / 3.0 } else { 0.2 };
                if roll < cure {
                    mon.status = None;
                    (format!("|-curestatus|{ident}|{}|[msg]", status.to_protocol()), false)
                } else {
                    (format!("|cant|{ident}|{}", status.to_protocol()), true)
                }
            }
            _ => return false,
        };
        self.emit(line);
        stuck
    }

    fn apply_boosts(&mut self, player: Player, changes: &[(Stat, i8)]) {
        let side = self.side_mut(player);
        let ident = side.active_ident();
        let mon = side.active_mut();
        let mut lines = Vec::new();
        for &(stat, amount) in changes {
            let applied = mon.boosts.boost(stat, amount);
            let verb = if amount >= 0 { "-boost" } else { "-unboost" };
            lines.push(format!("|{verb}|{ident}|{}|{}", stat_id(stat), applied.unsigned_abs()));
        }
        self.chunk.extend(lines);
    }

    fn use_move(&mut self, player: Player, slot: usize, was_protected: bool, protected: &mut [bool; 2]) {
        if self.immobilized(player) {
            return;
        }
        let foe = player.opponent();
        let mv = Self::move_at(self.side(player), slot);
        let user = self.side(player).active_ident();
        let target = self.side(foe).active_ident();

        {
            let mon = self.side_mut(player).active_mut();
            if !mon.is_struggling()
                && let Some(move_slot) = mon.moves.get_mut(slot - 1)
            {
                move_slot.pp = move_slot.pp.saturating_sub(1);
            }
        }
        let name = if std::ptr::eq(mv, struggle()) {
            "Struggle".to_string()
        } else {
            self.side(player).active().moves[slot - 1].name.clone()
        };

        let self_targeted = !mv.is_damaging()
            && matches!(
                mv.effect,
                MoveEffect::Protect
                    | MoveEffect::SelfBoost(_)
                    | MoveEffect::Heal(_)
                    | MoveEffect::Screen(_)
                    | MoveEffect::Weather(_)
            );
        let shown_target = if self_targeted { &user } else { &target };
        self.emit(format!("|move|{user}|{name}|{shown_target}"));

        if self_targeted {
            self.self_effect(player, mv, was_protected, protected);
            return;
        }

        if let MoveEffect::Hazard(hazard) = mv.effect {
            let foe_side = self.side_mut(foe);
            let layers = foe_side.hazards.entry(hazard).or_insert(0);
            if *layers >= hazard.max_layers() {
                self.emit(format!("|-fail|{user}"));
            } else {
                *layers += 1;
                let line = format!("|-sidestart|{}|move: {hazard}", foe_side.ident());
                self.emit(line);
            }
            return;
        }

        if self.side(foe).active().is_fainted() {
            self.emit(format!("|-notarget|{user}"));
            return;
        }
        if protected[foe.index()] {
            self.emit(format!("|-activate|{target}|move: Protect"));
            return;
        }

        let attacker = self.side(player).active().combatant();
        let defender = self.side(foe).active().combatant();
        let effectiveness = mv.move_type.effectiveness_multi(&defender.types);
        let inflicts = matches!(mv.effect, MoveEffect::Inflict { .. });
        if effectiveness == 0.0 && (mv.is_damaging() || inflicts) {
            self.emit(format!("|-immune|{target}"));
            return;
        }

        if mv.accuracy.is_some() {
            let chance = mv.hit_chance()
                * StatStages::accuracy_multiplier(attacker.boosts.accuracy - defender.boosts.evasion);
            if !self.rng.gen_bool(f64::from(chance.clamp(0.0, 1.0))) {
                self.emit(format!("|-miss|{user}|{target}"));
                return;
            }
        }

        let mut dealt = 0;
        if mv.is_damaging() {
            let foe_side = self.side(foe);
            let ctx = DamageContext {
                weather: self.weather.map(|(w, _)| w),
                terrain: None,
                reflect: foe_side.has_timed(SideCondition::Reflect)
                    || foe_side.has_timed(SideCondition::AuroraVeil),
                light_screen: foe_side.has_timed(SideCondition::LightScreen)
                    || foe_side.has_timed(SideCondition::AuroraVeil),
            };
            if effectiveness > 1.0 {
                self.emit(format!("|-supereffective|{target}"));
            } else if effectiveness < 1.0 {
                self.emit(format!("|-resisted|{target}"));
            }

            let hits = self.rng.gen_range(mv.hits.0..=mv.hits.1.max(mv.hits.0));
            let mut landed = 0;
            for _ in 0..hits {
                if self.side(foe).active().is_fainted() {
                    break;
                }
                let roll = self.rng.gen_range(0.85..=1.0);
                let crit = self.rng.gen_bool(CRIT_CHANCE);
                let damage = hit_damage(&attacker, &defender, mv, &ctx, roll, crit);
                if crit {
                    self.emit(format!("|-crit|{target}"));
                }
                let mon = self.side_mut(foe).active_mut();
                dealt += mon.damage(damage);
                let line = format!("|-damage|{target}|{}", mon.condition());
                self.emit(line);
                landed += 1;
            }
            if mv.hits.1 > 1 {
                self.emit(format!("|-hitcount|{target}|{landed}"));
            }
        }

        self.secondary_effect(player, mv, dealt);
        self.announce_faint(foe);
        self.announce_faint(player);
    }

    fn self_effect(
        &mut self,
        player: Player,
        mv: &'static MoveData,
        was_protected: bool,
        protected: &mut [bool; 2],
    ) {
        let user = self.side(player).active_ident();
        match mv.effect {
            MoveEffect::Protect => {
                if was_protected {
                    self.emit(format!("|-fail|{user}"));
                } else {
                    protected[player.index()] = true;
                    self.side_mut(player).active_mut().protected_last = true;
                    self.emit(format!("|-singleturn|{user}|Protect"));
                }
            }
            MoveEffect::SelfBoost(changes) => self.apply_boosts(player, changes),
            MoveEffect::Heal(fraction) => {
                let mon = self.side_mut(player).active_mut();
                if mon.hp == mon.max_hp {
                    self.emit(format!("|-fail|{user}"));
                } else {
                    mon.heal(fraction_of(mon.max_hp, fraction));
                    let line = format!("|-heal|{user}|{}", mon.condition());
                    self.emit(line);
                }
            }
            MoveEffect::Screen(screen) => {
                let side = self.side_mut(player);
                if side.has_timed(screen) {
                    self.emit(format!("|-fail|{user}"));
                } else {
                    side.timed.insert(screen, FIELD_TURNS);
                    let line = format!("|-sidestart|{}|move: {screen}", side.ident());
                    self.emit(line);
                }
            }
            MoveEffect::Weather(weather) => {
                if self.weather.is_some_and(|(w, _)| w == weather) {
                    self.emit(format!("|-fail|{user}"));
                } else {
                    self.weather = Some((weather, FIELD_TURNS));
                    self.emit(format!("|-weather|{}", weather.to_protocol()));
                }
            }
            _ => {}
        }
    }

    /// Effects that follow a move landing; `dealt` is the HP it took
    fn secondary_effect(&mut self, player: Player, mv: &'static MoveData, dealt: u32) {
        let foe = player.opponent();
        let user = self.side(player).active_ident();
        let target = self.side(foe).active_ident();

        match mv.effect {
            MoveEffect::Inflict { status, chance } => {
                let safeguard = self.side(foe).has_timed(SideCondition::Safeguard);
                let open = !safeguard && self.side(foe).active().can_take_status(status);
                if !open {
                    if !mv.is_damaging() {
                        self.emit(format!("|-fail|{target}"));
                    }
                    return;
                }
                if self.rng.gen_range(0..100) < u32::from(chance.min(100)) {
                    self.side_mut(foe).active_mut().status = Some(status);
                    self.emit(format!("|-status|{target}|{}", status.to_protocol()));
                }
            }
            MoveEffect::SelfBoost(changes) if !self.side(player).active().is_fainted() => {
                self.apply_boosts(player, changes);
            }
            MoveEffect::Drain(fraction) if dealt > 0 => {
                let mon = self.side_mut(player).active_mut();
                if !mon.is_fainted() && mon.hp < mon.max_hp {
                    mon.heal(((dealt as f32 * fraction).round() as u32).max(1));
                    let line = format!("|-heal|{user}|{}|[from] drain|[of] {target}", mon.condition());
                    self.emit(line);
                }
            }
            MoveEffect::Recoil(fraction) if dealt > 0 => {
                let mon = self.side_mut(player).active_mut();
                mon.damage(((dealt as f32 * fraction).round() as u32).max(1));
                let line = format!("|-damage|{user}|{}|[from] Recoil", mon.condition());
                self.emit(line);
            }
            _ => {}
        }
    }

    /// Status and weather chip, then field timers
    fn residual(&mut self) {
        let weather = self.weather.map(|(w, _)| w);
        for player in Player::BOTH {
            let side = self.side_mut(player);
            let ident = side.active_ident();
            let mon = side.active_mut();
            let mut lines = Vec::new();
            if mon.is_fainted() {
                continue;
            }
            if let Some(status) = mon.status {
                let fraction = status.residual_fraction();
                if fraction > 0.0 {
                    mon.damage(fraction_of(mon.max_hp, fraction));
                    let from = status.to_protocol();
                    lines.push(format!("|-damage|{ident}|{}|[from] {from}", mon.condition()));
                }
            }
            if let Some(weather) = weather
                && !mon.is_fainted()
                && weather.chips(&mon.types())
            {
                mon.damage(fraction_of(mon.max_hp, 1.0 / 16.0));
                let from = weather.to_protocol();
                lines.push(format!("|-damage|{ident}|{}|[from] {from}", mon.condition()));
            }
            self.chunk.extend(lines);
            self.announce_faint(player);
        }

        if let Some((weather, turns)) = self.weather {
            if turns <= 1 {
                self.weather = None;
                self.emit("|-weather|none");
            } else {
                self.weather = Some((weather, turns - 1));
                self.emit(format!("|-weather|{}|[upkeep]", weather.to_protocol()));
            }
        }

        for player in Player::BOTH {
            let side = self.side_mut(player);
            let side_ident = side.ident();
            let mut ended = Vec::new();
            side.timed.retain(|condition, turns| {
                *turns = turns.saturating_sub(1);
                if *turns == 0 {
                    ended.push(*condition);
                }
                *turns > 0
            });
            ended.sort_by_key(|c| c.to_string());
            for condition in ended {
                self.emit(format!("|-sideend|{side_ident}|move: {condition}"));
            }
        }
    }
}
