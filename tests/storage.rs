//! Integration tests for stores, JSON import/export, and CSV rosters.

use matchup_tournament_web::{
    export_tournament, import_tournament, parse_roster_csv, start_tournament_with_rng,
    submit_result, JsonFileStore, MatchRef, MatchResult, MemoryStore, Outcome, Player, Seat,
    SeriesScore, Tournament, TournamentStore, TournamentType,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn played_tournament() -> Tournament {
    let players = (0..3).map(|i| Player::new(format!("P{i}"))).collect();
    let mut t = Tournament::with_players(players, TournamentType::SingleElimination, true);
    start_tournament_with_rng(&mut t, &mut StdRng::seed_from_u64(4)).unwrap();
    let open = t
        .current_matchups()
        .iter()
        .find(|m| !m.is_decided())
        .map(|m| m.match_number)
        .unwrap();
    submit_result(
        &mut t,
        MatchRef::Round { round: 0, match_number: open },
        SeriesScore::new(2, 1).into(),
    )
    .unwrap();
    t
}

#[test]
fn import_without_best_of_three_defaults_to_false() {
    let a = Player::new("Alice");
    let b = Player::new("Bob");
    let text = format!(
        r#"{{
            "players": [
                {{ "id": "{a}", "name": "Alice", "score": 0, "wins": 0, "losses": 0, "ties": 0 }},
                {{ "id": "{b}", "name": "Bob" }}
            ],
            "rounds": [[
                {{ "players": [{{ "player": "{a}" }}, {{ "player": "{b}" }}], "result": null, "matchNumber": 1 }}
            ]],
            "currentRound": 0
        }}"#,
        a = a.id,
        b = b.id
    );
    let t = import_tournament(&text).unwrap();
    assert!(!t.best_of_three);
    assert!(!t.tournament_started);
    assert_eq!(t.tournament_type, TournamentType::SingleElimination);
    assert_eq!(t.players.len(), 2);
    assert_eq!(t.players[1].wins, 0);
    assert_eq!(t.rounds[0][0].players, [Seat::Player(a.id), Seat::Player(b.id)]);
}

#[test]
fn import_reads_integer_and_series_results() {
    let a = Player::new("Alice");
    let b = Player::new("Bob");
    let text = format!(
        r#"{{
            "players": [{{ "id": "{a}", "name": "Alice" }}, {{ "id": "{b}", "name": "Bob" }}],
            "rounds": [[
                {{ "players": [{{ "player": "{a}" }}, {{ "player": "{b}" }}], "result": 2, "matchNumber": 1 }},
                {{ "players": [{{ "player": "{b}" }}, "bye"], "result": 1, "matchNumber": 2 }},
                {{ "players": [{{ "player": "{b}" }}, {{ "player": "{a}" }}], "result": {{ "firstPlayerWins": 2, "secondPlayerWins": 1 }}, "matchNumber": 3 }}
            ]],
            "currentRound": 0,
            "tournamentType": "round-robin",
            "bestOfThree": true
        }}"#,
        a = a.id,
        b = b.id
    );
    let t = import_tournament(&text).unwrap();
    let round = &t.rounds[0];
    assert_eq!(round[0].result, Some(MatchResult::Single(Outcome::SecondWins)));
    assert!(round[1].has_bye());
    assert_eq!(round[2].result, Some(MatchResult::BestOfThree(SeriesScore::new(2, 1))));
    assert_eq!(t.tournament_type, TournamentType::RoundRobin);
    assert!(t.best_of_three);
}

#[test]
fn import_failures_carry_messages() {
    let cases = [
        ("not json", "Invalid JSON"),
        ("[1, 2]", "expected a JSON object"),
        (r#"{"rounds": [], "currentRound": 0}"#, "missing \"players\""),
        (r#"{"players": [], "currentRound": 0}"#, "missing \"rounds\""),
        (r#"{"players": [], "rounds": []}"#, "\"currentRound\" is not defined"),
        (r#"{"players": [], "rounds": [], "currentRound": null}"#, "\"currentRound\" is not defined"),
        (r#"{"players": 5, "rounds": [], "currentRound": 0}"#, "Invalid tournament data"),
    ];
    for (text, expected) in cases {
        let err = import_tournament(text).unwrap_err();
        assert!(
            err.message.contains(expected),
            "{text}: got {:?}",
            err.message
        );
    }
}

#[test]
fn import_rejects_unknown_players_in_matchups() {
    let a = Player::new("Alice");
    let stranger = Player::new("Mallory");
    let text = format!(
        r#"{{
            "players": [{{ "id": "{a}", "name": "Alice" }}],
            "rounds": [[{{ "players": [{{ "player": "{a}" }}, {{ "player": "{s}" }}], "matchNumber": 1 }}]],
            "currentRound": 0
        }}"#,
        a = a.id,
        s = stranger.id
    );
    let err = import_tournament(&text).unwrap_err();
    assert!(err.message.contains("not in \"players\""));
}

#[test]
fn restart_keeps_imported_players_that_could_not_be_added_by_name() {
    let players = [Player::new("Al"), Player::new("al"), Player::new("Cy")];
    let text = format!(
        r#"{{
            "players": [
                {{ "id": "{a}", "name": "Al", "wins": 1 }},
                {{ "id": "{b}", "name": "al", "losses": 1 }},
                {{ "id": "{c}", "name": "Cy" }}
            ],
            "rounds": [[{{ "players": [{{ "player": "{a}" }}, {{ "player": "{b}" }}], "result": 1, "matchNumber": 1 }}]],
            "currentRound": 0,
            "tournamentStarted": true,
            "tournamentType": "round-robin"
        }}"#,
        a = players[0].id,
        b = players[1].id,
        c = players[2].id
    );
    let mut t = import_tournament(&text).unwrap();
    t.restart_tournament().unwrap();

    assert!(!t.tournament_started);
    assert!(t.rounds.is_empty());
    let ids: Vec<_> = t.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, players.iter().map(|p| p.id).collect::<Vec<_>>());
    let names: Vec<&str> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Al", "al", "Cy"]);
    assert!(t.players.iter().all(|p| p.wins == 0 && p.losses == 0));
}

#[test]
fn export_then_import_keeps_state() {
    let t = played_tournament();
    let json = export_tournament(&t).unwrap();
    assert!(json.contains('\n'), "export is pretty-printed");
    assert!(json.contains("\"currentRound\""));
    let back = import_tournament(&json).unwrap();
    assert_eq!(back.id, t.id);
    assert_eq!(back.players, t.players);
    assert_eq!(back.rounds, t.rounds);
    assert!(back.best_of_three);
}

#[test]
fn memory_store_is_namespaced() {
    let t = played_tournament();
    let mut store = MemoryStore::new("league");
    assert!(store.load("main").unwrap().is_none());

    store.save("main", &t).unwrap();
    let loaded = store.load("main").unwrap().unwrap();
    assert_eq!(loaded.players, t.players);
    assert!(store.load("other").unwrap().is_none());

    store.remove("main").unwrap();
    assert!(store.load("main").unwrap().is_none());
}

#[test]
fn memory_store_tolerates_missing_optional_fields() {
    let mut store = MemoryStore::new("legacy");
    store.insert_raw("main", r#"{"players": [], "rounds": [], "currentRound": 0}"#);
    let t = store.load("main").unwrap().unwrap();
    assert!(!t.best_of_three);
    assert!(t.third_place_match.is_none());
}

#[test]
fn json_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("nested"), "tournament");
    let t = played_tournament();
    let key = t.id.to_string();

    assert!(store.load(&key).unwrap().is_none());
    store.save(&key, &t).unwrap();
    assert!(dir
        .path()
        .join("nested")
        .join(format!("tournament-{key}.json"))
        .exists());

    let loaded = store.load(&key).unwrap().unwrap();
    assert_eq!(loaded.rounds, t.rounds);
    assert_eq!(loaded.current_round, t.current_round);

    store.remove(&key).unwrap();
    assert!(store.load(&key).unwrap().is_none());
    store.remove(&key).unwrap();
}

#[test]
fn json_file_store_reports_corrupt_data() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("t-main.json"), "{ broken").unwrap();
    let store = JsonFileStore::new(dir.path(), "t");
    assert!(store.load("main").is_err());
}

#[test]
fn roster_csv_skips_header_and_blanks() {
    let csv = "name,team\nAlice,Red\n\n  Bob  ,Blue\nCarol\n,\n";
    let names = parse_roster_csv(csv.as_bytes()).unwrap();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
}

#[test]
fn roster_csv_without_header() {
    let names = parse_roster_csv("Dave\nErin\n".as_bytes()).unwrap();
    assert_eq!(names, vec!["Dave", "Erin"]);
}
