use service_repository::rdf::{BlankNode, Literal, Model, NamedNode, Predicate, Triple};
use service_repository::{RepositoryConfig, RepositoryError, ServiceRepository};
use tempfile::TempDir;

fn open_repo(dir: &TempDir) -> ServiceRepository {
    ServiceRepository::open(RepositoryConfig::with_root(dir.path())).unwrap()
}

fn statement(service: &str, operation: &str) -> Triple {
    Triple::new(
        NamedNode::new(&format!("http://example.org/services/{service}"))
            .unwrap()
            .into(),
        Predicate::new("http://example.org/ontology#hasOperation").unwrap(),
        Literal::new_simple_literal(operation).into(),
    )
}

#[test]
fn test_add_then_get_returns_same_statements() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    let mut model = Model::from_triples([statement("geo", "lookup"), statement("geo", "reverse")]);
    model.prefixes_mut().set_prefix("svc", "http://example.org/services/");

    repo.add_model(&model, Some("geo.ttl")).unwrap();

    let stored = repo.get_named_model(Some("geo.ttl")).unwrap().unwrap();
    assert!(stored.same_triples(&model));
    assert_eq!(stored.prefixes().get_iri("svc").unwrap(), "http://example.org/services/");
}

#[test]
fn test_second_add_replaces_first() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("geo"))
        .unwrap();
    let mut second = Model::from_triples([statement("geo", "reverse")]);
    second.prefixes_mut().set_prefix("ex", "http://example.org/");
    repo.add_model(&second, Some("geo")).unwrap();
    repo.add_model(&Model::from_triples([statement("geo", "batch")]), Some("geo"))
        .unwrap();

    let stored = repo.get_named_model(Some("geo")).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored.contains(&statement("geo", "batch")));
    assert!(stored.prefixes().is_empty());
}

#[test]
fn test_missing_name_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);
    repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("geo"))
        .unwrap();

    let other = Model::from_triples([statement("weather", "forecast")]);
    assert!(matches!(repo.add_model(&other, None), Err(RepositoryError::MissingName)));
    assert!(matches!(repo.get_named_model(None), Err(RepositoryError::MissingName)));
    assert!(matches!(repo.clear_named_model(None), Err(RepositoryError::MissingName)));

    let union = repo.get_model().unwrap();
    assert_eq!(union.len(), 1);
    assert!(union.contains(&statement("geo", "lookup")));
}

#[test]
fn test_unknown_name_is_absent() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    assert!(repo.get_named_model(Some("never-added")).unwrap().is_none());
    assert!(!repo.clear_named_model(Some("never-added")).unwrap());
    assert!(!repo.contains_named_model("never-added").unwrap());
}

#[test]
fn test_union_contains_all_graphs() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    let t1 = statement("geo", "lookup");
    let t2 = statement("weather", "forecast");
    repo.add_model(&Model::from_triples([t1.clone()]), Some("A")).unwrap();
    repo.add_model(&Model::from_triples([t2.clone()]), Some("B")).unwrap();

    let union = repo.get_model().unwrap();
    assert!(union.contains(&t1));
    assert!(union.contains(&t2));
}

#[test]
fn test_union_reflects_later_changes() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("A"))
        .unwrap();
    repo.add_model(&Model::from_triples([statement("weather", "forecast")]), Some("B"))
        .unwrap();
    assert_eq!(repo.get_model().unwrap().len(), 2);

    repo.clear_named_model(Some("A")).unwrap();
    let union = repo.get_model().unwrap();
    assert_eq!(union.len(), 1);
    assert!(union.contains(&statement("weather", "forecast")));
}

#[test]
fn test_clear_removes_graph() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("geo"))
        .unwrap();
    assert!(repo.clear_named_model(Some("geo")).unwrap());

    assert!(repo.get_named_model(Some("geo")).unwrap().is_none());
    assert!(repo.list_named_models().unwrap().is_empty());
    assert!(repo.get_model().unwrap().is_empty());
}

#[test]
fn test_list_named_models() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    repo.add_model(
        &Model::from_triples([statement("weather", "forecast"), statement("weather", "alerts")]),
        Some("weather"),
    )
    .unwrap();
    repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("geo"))
        .unwrap();

    let graphs = repo.list_named_models().unwrap();
    let names: Vec<_> = graphs.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["geo", "weather"]);
    assert_eq!(graphs[1].triple_count, 2);

    let info = repo.graph_info("weather").unwrap().unwrap();
    assert_eq!(info, graphs[1]);
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let node = BlankNode::new();
    let model = Model::from_triples([
        statement("geo", "lookup"),
        Triple::new(
            node.into(),
            Predicate::new("http://example.org/ontology#name").unwrap(),
            Literal::new_language_tagged_literal("Adresse", "de").unwrap().into(),
        ),
    ]);

    {
        let repo = open_repo(&dir);
        repo.add_model(&model, Some("geo")).unwrap();
        repo.close().unwrap();
    }

    let repo = open_repo(&dir);
    let stored = repo.get_named_model(Some("geo")).unwrap().unwrap();
    assert!(stored.same_triples(&model));
}

#[test]
fn test_writes_survive_drop_without_close() {
    let dir = TempDir::new().unwrap();

    {
        let repo = open_repo(&dir);
        repo.add_model(&Model::from_triples([statement("geo", "lookup")]), Some("geo"))
            .unwrap();
        repo.add_model(&Model::from_triples([statement("weather", "forecast")]), Some("weather"))
            .unwrap();
        repo.clear_named_model(Some("weather")).unwrap();
    }

    let repo = open_repo(&dir);
    let names: Vec<_> = repo
        .list_named_models()
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["geo"]);
    assert!(repo
        .get_named_model(Some("geo"))
        .unwrap()
        .unwrap()
        .contains(&statement("geo", "lookup")));
}

#[test]
fn test_shared_across_threads() {
    let dir = TempDir::new().unwrap();
    let repo = open_repo(&dir);

    std::thread::scope(|scope| {
        for i in 0..4 {
            let repo = &repo;
            scope.spawn(move || {
                let name = format!("svc-{i}");
                let model = Model::from_triples([statement(&name, "run")]);
                repo.add_model(&model, Some(&name)).unwrap();
            });
        }
    });

    assert_eq!(repo.list_named_models().unwrap().len(), 4);
    assert_eq!(repo.get_model().unwrap().len(), 4);
}
