//! Team export in the Pokémon Showdown paste format.

use crate::roster::TeamMember;
use crate::stats::{MAX_IV, MAX_LEVEL, Nature, StatName, StatSpread};

fn spread_line(label: &str, spread: &StatSpread, keep: impl Fn(u32) -> bool) -> Option<String> {
    let parts: Vec<String> = StatName::ALL
        .into_iter()
        .filter(|stat| keep(spread.get(*stat)))
        .map(|stat| format!("{} {}", spread.get(stat), stat.abbreviation()))
        .collect();
    (!parts.is_empty()).then(|| format!("{label}: {}", parts.join(" / ")))
}

pub fn export_member(member: &TeamMember) -> String {
    let build = &member.build;
    let mut lines = Vec::new();

    let mut name_line = if build.nickname.is_empty() {
        member.name.clone()
    } else {
        format!("{} ({})", build.nickname, member.name)
    };
    if !build.item.is_empty() {
        name_line.push_str(" @ ");
        name_line.push_str(&build.item);
    }
    lines.push(name_line);

    if !build.ability.is_empty() {
        lines.push(format!("Ability: {}", build.ability));
    }
    if build.level() != MAX_LEVEL {
        lines.push(format!("Level: {}", build.level()));
    }
    lines.extend(spread_line("EVs", build.evs(), |ev| ev > 0));
    if build.nature != Nature::Hardy {
        lines.push(format!("{} Nature", build.nature.display_name()));
    }
    lines.extend(spread_line("IVs", build.ivs(), |iv| iv < MAX_IV));
    lines.extend(build.moves().map(|name| format!("- {name}")));

    lines.join("\n")
}

/// Members separated by a blank line.
pub fn export_team(team: &[TeamMember]) -> String {
    team.iter().map(export_member).collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PokemonSummary;
    use crate::types::{PokemonType, Typing};

    fn member(name: &str) -> TeamMember {
        TeamMember::from_summary(&PokemonSummary {
            id: 445,
            name: name.to_string(),
            image: None,
            sprite: None,
            types: Typing::dual(PokemonType::Dragon, PokemonType::Ground),
            stats: StatSpread::default(),
            abilities: vec!["rough-skin".to_string()],
        })
    }

    #[test]
    fn test_default_build_export() {
        assert_eq!(export_member(&member("garchomp")), "garchomp\nAbility: rough-skin");
    }

    #[test]
    fn test_full_build_export() {
        let mut garchomp = member("garchomp");
        let build = &mut garchomp.build;
        build.nickname = "Chompy".to_string();
        build.item = "choice-scarf".to_string();
        build.set_level(50);
        build.nature = Nature::Jolly;
        build.set_ev(StatName::Attack, 252);
        build.set_ev(StatName::SpecialDefense, 4);
        build.set_ev(StatName::Speed, 252);
        build.set_iv(StatName::SpecialAttack, 0);
        build.set_move(0, "earthquake").unwrap();
        build.set_move(2, "outrage").unwrap();

        assert_eq!(
            export_member(&garchomp),
            "Chompy (garchomp) @ choice-scarf\n\
             Ability: rough-skin\n\
             Level: 50\n\
             EVs: 252 Atk / 4 SpD / 252 Spe\n\
             Jolly Nature\n\
             IVs: 0 SpA\n\
             - earthquake\n\
             - outrage"
        );
    }

    #[test]
    fn test_team_members_separated_by_blank_line() {
        let team = [member("garchomp"), member("gible")];
        assert_eq!(
            export_team(&team),
            "garchomp\nAbility: rough-skin\n\ngible\nAbility: rough-skin"
        );
        assert_eq!(export_team(&[]), "");
    }
}
