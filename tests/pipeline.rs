use std::path::Path;

use kb_indexer::{
    Classifier,
    ClassificationPolicy,
    SiteConfig,
    SiteRoot,
    TaxonomyDefinition,
    fields,
    front_matter::{self, SerializeOptions},
    index,
    rewrite::Outcome,
    walker,
};
use serde_yaml::Value;

const CONFIG: &str = "\
title: Notes
collections:
  knowledge-base:
    output: true
    permalink: /kb/:path/
";

const TAXONOMY: &str = "\
categories:
  - id: blog
    name: Blog
    subcategories:
      - id: system-kernel-network
        name: Kernel and networking
        weight: 4
  - id: knowledge-base
    name: Knowledge base
    subcategories:
      - id: data-engineering
        name: Data engineering
        weight: 2
      - id: web-app-dev
        name: Web
        weight: 7
";

const EBPF_POST: &str = "---
title: eBPF 기반 패킷 필터링
date: 2024-01-15
---
리눅스 커널에서 ebpf 프로그램과 xdp 훅을 이용해 패킷을 처리하는 방법을 정리한다.
tcp 스택을 거치기 전에 처리할 수 있다.
";

const KAFKA_NOTE: &str = "---
title: Kafka 스트림 정리
date: 2024-03-01
---
카프카와 스파크로 실시간 데이터 파이프라인을 구성한 경험을 정리한다.
kafka 토픽 설계, kafka 파티션, spark 스트리밍 잡을 다룬다.
";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup_site(root: &Path) {
    write(root, "_config.yml", CONFIG);
    write(root, "_data/taxonomy.yml", TAXONOMY);
    write(root, "_posts/2024-01-15-ebpf.md", EBPF_POST);
    write(root, "_posts/2023-12-31-plain.md", "# No front matter\n");
    write(root, "_knowledge-base/data/kafka.md", KAFKA_NOTE);
}

fn site_files(site: &SiteRoot) -> Vec<std::path::PathBuf> {
    let mut files = walker::discover_markdown(&site.posts_dir()).unwrap();
    files.extend(
        walker::discover_markdown(&site.collection_dir("knowledge-base"))
            .unwrap(),
    );
    files.into_iter().map(|f| f.path).collect()
}

fn classifier(site: &SiteRoot) -> Classifier {
    let weights = TaxonomyDefinition::load(&site.taxonomy_file())
        .unwrap()
        .weights();
    Classifier::new(ClassificationPolicy::default())
        .unwrap()
        .with_weights(weights)
}

#[test]
fn classify_then_index_site() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_site(tmp.path());
    let site = SiteRoot::new(tmp.path())?;
    let classifier = classifier(&site);

    let mut rewritten = 0;
    let mut skipped = 0;
    for path in site_files(&site) {
        match classifier.process_file(&path, SerializeOptions::default())? {
            Outcome::Rewritten(_) => rewritten += 1,
            Outcome::NoMetadata => skipped += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!((rewritten, skipped), (2, 1));

    let post = front_matter::read_document(
        &site.posts_dir().join("2024-01-15-ebpf.md"),
    )?
    .unwrap();
    assert_eq!(
        fields::taxonomy_pair(&post.metadata),
        (
            Some("blog".to_string()),
            Some("system-kernel-network".to_string())
        )
    );
    assert_eq!(
        fields::taxonomy(&post.metadata).and_then(|t| t.get("order")),
        Some(&Value::from(4))
    );
    assert_eq!(
        fields::text(&post.metadata, fields::LAYOUT).as_deref(),
        Some("knowledge-base")
    );
    assert!(post.body.starts_with("리눅스 커널에서"));

    let note = front_matter::read_document(
        &site.collection_dir("knowledge-base").join("data/kafka.md"),
    )?
    .unwrap();
    assert_eq!(
        fields::taxonomy_pair(&note.metadata),
        (
            Some("knowledge-base".to_string()),
            Some("data-engineering".to_string())
        )
    );
    assert_eq!(
        fields::string_list(&note.metadata, fields::KEYWORDS),
        vec!["Kafka", "Spark"]
    );

    // Second pass converges: nothing is rewritten.
    for path in site_files(&site) {
        let outcome =
            classifier.process_file(&path, SerializeOptions::default())?;
        assert!(!outcome.was_rewritten(), "{} rewritten", path.display());
    }

    let config = SiteConfig::load(&site.config_file())?;
    let output = site.search_index_file();
    let built = index::generate(&site, &config, 280, &output)?;

    assert_eq!(built.document_count, 2);
    let kafka = &built.documents[0];
    assert_eq!(kafka.collection, "knowledge-base");
    assert_eq!(kafka.url, "/kb/data/kafka/");
    assert_eq!(kafka.date, "2024-03-01T00:00:00");

    let ebpf = &built.documents[1];
    assert_eq!(ebpf.collection, "posts");
    assert_eq!(ebpf.url, "/2024/01/15/ebpf-기반-패킷-필터링.html");
    assert_eq!(ebpf.relative_path, "_posts/2024-01-15-ebpf.md");
    assert_eq!(ebpf.keywords, vec!["eBPF", "XDP"]);
    assert!(ebpf.search_text.contains("blog system-kernel-network"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(written["document_count"], 2);
    assert_eq!(written["documents"][0]["url"], "/kb/data/kafka/");
    Ok(())
}

#[test]
fn stale_order_is_repaired_after_taxonomy_change()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_site(tmp.path());
    let site = SiteRoot::new(tmp.path())?;
    for path in site_files(&site) {
        classifier(&site).process_file(&path, SerializeOptions::default())?;
    }

    write(
        tmp.path(),
        "_data/taxonomy.yml",
        &TAXONOMY.replace("weight: 4", "weight: 9"),
    );
    let weights = TaxonomyDefinition::load(&site.taxonomy_file())?.weights();
    let path = site.posts_dir().join("2024-01-15-ebpf.md");

    let outcome = kb_indexer::rewrite::rewrite_if_changed(
        &path,
        SerializeOptions::default(),
        |doc| {
            Ok(kb_indexer::taxonomy::reconcile_order(
                &mut doc.metadata,
                &weights,
            ))
        },
    )?;
    let change = match outcome {
        Outcome::Rewritten(Some(change)) => change,
        other => panic!("expected a rewrite, got {other:?}"),
    };
    assert_eq!(change.to_string(), "blog/system-kernel-network order 4 -> 9");
    Ok(())
}

#[test]
fn report_counts_documents_per_subcategory()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    setup_site(tmp.path());
    let site = SiteRoot::new(tmp.path())?;
    for path in site_files(&site) {
        classifier(&site).process_file(&path, SerializeOptions::default())?;
    }

    let definition = TaxonomyDefinition::load(&site.taxonomy_file())?;
    let config = SiteConfig::load(&site.config_file())?;
    let documents = index::collect_site_documents(&site, &config)?;
    let report = kb_indexer::taxonomy::populated_subcategories(
        &definition,
        documents.iter().map(|d| d.metadata()),
    );

    let flat: Vec<_> = report
        .iter()
        .flat_map(|c| {
            c.subcategories
                .iter()
                .map(move |s| (c.id.as_str(), s.id.as_str(), s.document_count))
        })
        .collect();
    assert_eq!(
        flat,
        vec![
            ("blog", "system-kernel-network", 1),
            ("knowledge-base", "data-engineering", 1),
        ]
    );
    Ok(())
}
