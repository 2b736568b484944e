use poker_catalog::catalog::CatalogBuilder;
use poker_catalog::config::Config;
use poker_catalog::inventory::InventoryRecord;
use poker_catalog::matching::{
    apply_matches, normalize_path, ExternalRow, InMemoryLinkStore, LinkStore, MatchTier,
    PathMatcher,
};
use poker_catalog::{CatalogError, Franchise, ParserRegistry, TableType, TitleGenerator};

const BRACELET: &str = "10-wsop-2024-be-ev-21-25k-nlh-hr-ft-schutten-reclaims-chip-lead.mp4";

#[test]
fn test_known_filenames() {
    let registry = ParserRegistry::new().unwrap();

    let bracelet = registry.parse(BRACELET, "");
    assert_eq!(bracelet.franchise, Some(Franchise::Wsop));
    assert_eq!(bracelet.year, Some(2024));
    assert_eq!(bracelet.event_number, Some(21));
    assert_eq!(bracelet.buy_in.as_deref(), Some("25K"));
    assert_eq!(bracelet.game_type.as_deref(), Some("NLHE"));
    assert_eq!(bracelet.table_type, Some(TableType::FinalTable));
    assert!(bracelet.confidence >= 0.9);

    let circuit = registry.parse("WCLA24-15.mp4", "");
    assert_eq!(circuit.franchise, Some(Franchise::Wsop));
    assert_eq!(circuit.year, Some(2024));
    assert_eq!(circuit.clip_number, Some(15));
    assert_eq!(circuit.sub_category(), Some("CIRCUIT"));

    let gog = registry.parse("E01_GOG_final_edit_231106.mp4", "");
    assert_eq!(gog.franchise, Some(Franchise::Gog));
    assert_eq!(gog.episode_number, Some(1));
    assert_eq!(gog.year, Some(2023));

    let generic = registry.parse("random_video.mp4", "");
    assert_eq!(generic.franchise, None);
    assert!(generic.success);
    assert!(generic.confidence <= 0.30);
}

#[test]
fn test_every_input_gets_a_record() {
    let registry = ParserRegistry::new().unwrap();
    let inputs = [
        ("", ""),
        ("   ", "\\\\"),
        (".mp4", "/"),
        ("wsop-2024-.mp4", "/ARCHIVE/"),
        ("PAD_S_EP.mp4", "PAD"),
        ("$ GTD ?.mp4", "MPP"),
        ("Super High Roller.mp4", "GGMillions"),
        ("E_GOG_.mp4", "GOG"),
        ("파일이름.mov", "/nas/클린본/"),
    ];

    for (filename, path) in inputs {
        let selected = registry.select_parser(filename, path);
        let record = registry.parse(filename, path);
        assert_eq!(record.parser, selected.name(), "for {filename:?}");
        assert!((0.0..=1.0).contains(&record.confidence));
        if !record.success {
            assert!(record.confidence < 0.3, "failed parse ranked high: {filename:?}");
        }
    }
}

#[test]
fn test_titles_are_deterministic() {
    let registry = ParserRegistry::new().unwrap();
    let titles = TitleGenerator::new();
    let record = registry.parse(BRACELET, "/nas/WSOP/2024");

    let first = titles.generate(&record);
    let second = titles.generate(&record.clone());
    assert_eq!(first, second);
    assert!(!first.0.is_empty());
    assert!(first.1.chars().count() <= 30);
}

#[test]
fn test_normalization_scenario() {
    let normalized = normalize_path("\\\\10.10.100.122\\docker\\wsop\\2024\\video.mp4");
    assert!(!normalized.contains("10.10.100.122"));
    assert!(!normalized.contains("docker"));
    assert!(!normalized.contains('\\'));
    assert_eq!(normalized, normalized.to_lowercase());
    assert_eq!(normalize_path(&normalized), normalized);
}

#[test]
fn test_matching_scenario() {
    let mut matcher = PathMatcher::new();
    assert_eq!(
        matcher.resolve("WSOP/2024/VIDEO.MP4").unwrap_err(),
        CatalogError::IndexNotBuilt
    );

    matcher.build_index(&[InventoryRecord::new("inv-1", "wsop/2024/video.mp4")]);
    let exact = matcher.resolve("WSOP/2024/VIDEO.MP4").unwrap();
    assert_eq!(exact.tier, MatchTier::Exact);
    assert_eq!(exact.confidence, 1.0);

    // The folder entry "wsop/2024" is an ancestor of the input, a better tier than fuzzy
    let nested = matcher.resolve("wsop/2024/day3/video.mp4").unwrap();
    assert_eq!(nested.tier, MatchTier::Partial);
    assert!(nested.confidence > 0.5);

    let mut archive = PathMatcher::new();
    archive.build_index(&[InventoryRecord::new("inv-2", "archive/wsop/2024/day3/video.mp4")]);
    let fuzzy = archive.resolve("nas/share2/2024/day3/video.mp4").unwrap();
    assert_eq!(fuzzy.tier, MatchTier::Fuzzy);
    assert_eq!(fuzzy.confidence, 0.5);
}

#[test]
fn test_catalog_then_link() {
    let records = vec![
        InventoryRecord::new("a", "\\\\nas\\docker\\WSOP\\2024\\WCLA24-15.mp4"),
        InventoryRecord::new("b", "\\\\nas\\docker\\GOG\\E01_GOG_final_edit_231106.mp4"),
        InventoryRecord::new("c", "\\\\nas\\docker\\misc\\random_video.mp4"),
    ];

    let registry = ParserRegistry::new().unwrap();
    let build = CatalogBuilder::from_config(&registry, &Config::default())
        .unwrap()
        .build(&records);
    assert_eq!(build.stats.video_files_created, 2);

    let mut store = InMemoryLinkStore::new();
    for link in &build.graph.links {
        store.link_inventory(link.inventory_id.clone(), format!("video-{}", link.video_file));
    }
    store.set_row_link("row-3", "manual".to_string());

    let mut matcher = PathMatcher::new();
    matcher.build_index(&records);
    let rows = vec![
        ExternalRow::new("row-1", "smb://nas/docker/WSOP/2024/WCLA24-15.mp4"),
        ExternalRow::new("row-2", "smb://nas/docker/misc/random_video.mp4"),
        ExternalRow::new("row-3", "\\\\nas\\docker\\GOG\\"),
        ExternalRow::new("row-4", "smb://nas/docker/HCL"),
    ];
    let (results, stats) = matcher.resolve_all(&rows).unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.exact, 3);
    assert_eq!(stats.unmatched, 1);

    let applied = apply_matches(&results, 0.8, &mut store);
    assert_eq!(applied.applied, 1);
    assert_eq!(applied.dangling, 1);
    assert_eq!(applied.already_linked, 1);
    assert_eq!(applied.below_threshold, 1);
    assert_eq!(store.row_link("row-1").as_deref(), Some("video-0"));
    assert_eq!(store.row_link("row-3").as_deref(), Some("manual"));
}
