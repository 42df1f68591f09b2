//! Directory behavior against a live PostgreSQL database.
//!
//! Run with `cargo test -p corpdir-db -- --ignored` after pointing
//! `DATABASE_URL` at a scratch database (defaults to
//! `test_fixtures::DEFAULT_TEST_DATABASE_URL`).

use corpdir_db::test_fixtures::{company_request, language_map, unique, TestDatabase};
use corpdir_db::{CompanyDirectory, Database, Error, TagTranslations};

async fn setup() -> Database {
    TestDatabase::connect()
        .await
        .expect("Failed to connect to test database")
        .db
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_lookup_in_requested_language() {
    let db = setup().await;
    let ko = unique("원티드랩");
    let en = unique("Wantedlab");

    db.directory
        .create_company(
            company_request(&[("ko", ko.as_str()), ("en", en.as_str())], &[]),
            "ko",
        )
        .await
        .expect("create");

    let found = db
        .directory
        .lookup(&ko, "en")
        .await
        .expect("lookup")
        .expect("company exists");
    assert_eq!(found.company_name, en);

    // Any localized name resolves the company.
    let found = db.directory.lookup(&en, "ko").await.unwrap().unwrap();
    assert_eq!(found.company_name, ko);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_lookup_falls_back_to_first_stored_name() {
    let db = setup().await;
    let en = unique("X");

    db.directory
        .create_company(
            company_request(&[("en", en.as_str())], &[&[("ja", "タグ_1"), ("en", "tag_1")]]),
            "en",
        )
        .await
        .expect("create");

    let found = db.directory.lookup(&en, "ko").await.unwrap().unwrap();
    assert_eq!(found.company_name, en);
    // The tag group has no ko row: the first stored row (en, map order) wins.
    assert_eq!(found.tags, vec!["tag_1"]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_lookup_unknown_name_is_none() {
    let db = setup().await;
    let result = db.directory.lookup(&unique("nobody"), "en").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_dedups_identical_tags() {
    let db = setup().await;
    let name = unique("Acme");

    let created = db
        .directory
        .create_company(
            company_request(
                &[("en", name.as_str())],
                &[&[("en", "foo"), ("ko", "푸")], &[("en", "foo"), ("ja", "フー")]],
            ),
            "en",
        )
        .await
        .expect("create");
    assert_eq!(created.company_name, name);
    assert_eq!(created.tags, vec!["foo"]);

    let found = db.directory.lookup(&name, "en").await.unwrap().unwrap();
    assert_eq!(found.tags, vec!["foo"]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_without_display_language_writes_nothing() {
    let db = setup().await;
    let name = unique("Orphan");

    let err = db
        .directory
        .create_company(company_request(&[("en", name.as_str())], &[]), "ko")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert!(db.directory.lookup(&name, "en").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_rejects_empty_names() {
    let db = setup().await;
    let err = db
        .directory
        .create_company(company_request(&[], &[]), "en")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_same_name_in_several_languages() {
    let db = setup().await;
    let name = unique("LINE");

    let created = db
        .directory
        .create_company(
            company_request(&[("en", name.as_str()), ("ja", name.as_str())], &[]),
            "ja",
        )
        .await
        .expect("identical names across languages are accepted");
    assert_eq!(created.company_name, name);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_shared_name_next_to_distinct_name() {
    let db = setup().await;
    let en = unique("Kakao");
    let shared = unique("カカオ");
    let names = [
        ("en", en.as_str()),
        ("ja", shared.as_str()),
        ("ko", shared.as_str()),
    ];

    let created = db
        .directory
        .create_company(company_request(&names, &[]), "ko")
        .await
        .unwrap();
    assert_eq!(created.company_name, shared);

    for (language, expected) in names {
        let found = db
            .directory
            .lookup(&en, language)
            .await
            .unwrap()
            .expect("company exists");
        assert_eq!(found.company_name, expected, "language {}", language);
    }
    // A language with no name of its own gets the shared one.
    let found = db.directory.lookup(&en, "fr").await.unwrap().unwrap();
    assert_eq!(found.company_name, shared);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_shared_tag_text_next_to_distinct_text() {
    let db = setup().await;
    let name = unique("KakaoPay");
    let en_tag = unique("payments");
    let shared_tag = unique("決済");
    let translations = [
        ("en", en_tag.as_str()),
        ("ja", shared_tag.as_str()),
        ("ko", shared_tag.as_str()),
    ];

    db.directory
        .create_company(
            company_request(&[("en", name.as_str())], &[&translations[..]]),
            "en",
        )
        .await
        .unwrap();

    for (language, expected) in translations {
        let found = db
            .directory
            .lookup(&name, language)
            .await
            .unwrap()
            .expect("company exists");
        assert_eq!(found.tags, vec![expected.to_string()], "language {}", language);
    }

    // Same rule for tags added later.
    let later_en = unique("fintech");
    let later_shared = unique("핀테크");
    let later = TagTranslations::new(language_map(&[
        ("en", later_en.as_str()),
        ("ja", later_shared.as_str()),
        ("ko", later_shared.as_str()),
    ]));
    let updated = db
        .directory
        .add_tags(&name, vec![later], "ko")
        .await
        .unwrap();
    assert_eq!(updated.tags, vec![shared_tag.clone(), later_shared.clone()]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_two_shared_texts_in_one_map_rejected() {
    let db = setup().await;
    let a = unique("Alpha");
    let b = unique("Beta");

    let err = db
        .directory
        .create_company(
            company_request(
                &[
                    ("en", a.as_str()),
                    ("fr", a.as_str()),
                    ("ja", b.as_str()),
                    ("ko", b.as_str()),
                ],
                &[],
            ),
            "en",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(db.directory.lookup(&a, "en").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_add_tags_and_delete_by_any_translation() {
    let db = setup().await;
    let name = unique("Wantedlab");
    let tag_ko = unique("태그_4");
    let tag_en = unique("tag_4");

    db.directory
        .create_company(company_request(&[("en", name.as_str())], &[]), "en")
        .await
        .expect("create");

    let updated = db
        .directory
        .add_tags(
            &name,
            vec![TagTranslations::new(language_map(&[
                ("ko", tag_ko.as_str()),
                ("en", tag_en.as_str()),
            ]))],
            "ko",
        )
        .await
        .expect("add tags");
    assert_eq!(updated.tags, vec![tag_ko.clone()]);

    // Delete by the Korean text: the English translation goes too.
    let after = db
        .directory
        .remove_tag(&name, &tag_ko, "en")
        .await
        .expect("delete");
    assert!(after.tags.is_empty());

    for language in ["ko", "en", "ja"] {
        let view = db.directory.lookup(&name, language).await.unwrap().unwrap();
        assert!(view.tags.is_empty(), "tag still visible in {}", language);
    }
    assert!(db
        .directory
        .search_by_tag(&tag_en, "en")
        .await
        .unwrap()
        .is_empty());

    let err = db
        .directory
        .remove_tag(&name, &tag_ko, "en")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_keeps_other_tag_groups() {
    let db = setup().await;
    let name = unique("Acme");
    let gone = unique("gone");
    let kept = unique("kept");

    db.directory
        .create_company(
            company_request(
                &[("en", name.as_str())],
                &[&[("en", gone.as_str())], &[("en", kept.as_str())]],
            ),
            "en",
        )
        .await
        .expect("create");

    let after = db.directory.remove_tag(&name, &gone, "en").await.unwrap();
    assert_eq!(after.tags, vec![kept]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_add_tags_unknown_company_is_not_found() {
    let db = setup().await;
    let err = db
        .directory
        .add_tags(
            &unique("ghost"),
            vec![TagTranslations::new(language_map(&[("en", "x")]))],
            "en",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_unseen_language_is_registered() {
    let db = setup().await;
    let code = unique("x").replace('_', "-");
    let name = unique("Polyglot");

    db.directory
        .create_company(company_request(&[(code.as_str(), name.as_str())], &[]), &code)
        .await
        .expect("create with new language");

    let languages = db.directory.list_languages().await.unwrap();
    assert!(languages.iter().any(|l| l.code == code));

    let hits = db.directory.search_names(&name, &code).await.unwrap();
    assert_eq!(hits, vec![name]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_search_by_substring() {
    let db = setup().await;
    let marker = unique("Wanted");
    let lab = format!("{}lab", marker);
    let korea = format!("{} Korea", marker);

    for name in [&lab, &korea] {
        db.directory
            .create_company(company_request(&[("ko", name.as_str())], &[]), "ko")
            .await
            .expect("create");
    }

    let hits = db.directory.search_names(&marker, "ko").await.unwrap();
    assert_eq!(hits, vec![lab, korea]);

    // LIKE wildcards are literal.
    let hits = db
        .directory
        .search_names(&format!("{}%", marker), "ko")
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_search_by_tag_one_row_per_company() {
    let db = setup().await;
    let tag = unique("태그_16");
    let first = unique("First");
    let second = unique("Second");

    db.directory
        .create_company(
            company_request(
                &[("en", first.as_str())],
                &[&[("ko", tag.as_str())], &[("ko", tag.as_str())]],
            ),
            "en",
        )
        .await
        .unwrap();
    db.directory
        .create_company(
            company_request(&[("ja", second.as_str())], &[&[("ko", tag.as_str())]]),
            "ja",
        )
        .await
        .unwrap();

    let hits = db.directory.search_by_tag(&tag, "en").await.unwrap();
    assert_eq!(hits, vec![first, second]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_store_rejects_duplicate_text_in_group() {
    let db = setup().await;
    let name = unique("Dup");
    let other = unique("Other");

    let mut tx = db.pool.begin().await.unwrap();
    let ids = db
        .languages
        .ensure_tx(&mut tx, &["en".to_string()].into_iter().collect())
        .await
        .unwrap();
    let en = ids["en"];

    let company = db.store.create_company_tx(&mut tx).await.unwrap();
    let group = db.store.create_name_group_tx(&mut tx, company).await.unwrap();
    db.store
        .add_localized_name_tx(&mut tx, company, group, en, &name)
        .await
        .unwrap();
    let err = db
        .store
        .add_localized_name_tx(&mut tx, company, group, en, &name)
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    tx.rollback().await.unwrap();

    // Same text under two companies is fine.
    db.directory
        .create_company(company_request(&[("en", other.as_str())], &[]), "en")
        .await
        .unwrap();
    db.directory
        .create_company(company_request(&[("en", other.as_str())], &[]), "en")
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_store_delete_tag_maintains_group() {
    let db = setup().await;
    let mut tx = db.pool.begin().await.unwrap();
    let ids = db
        .languages
        .ensure_tx(
            &mut tx,
            &["en".to_string(), "ko".to_string()].into_iter().collect(),
        )
        .await
        .unwrap();

    let company = db.store.create_company_tx(&mut tx).await.unwrap();
    let group = db.store.create_tag_group_tx(&mut tx, company).await.unwrap();
    let en_tag = db
        .store
        .add_localized_tag_tx(&mut tx, company, group, ids["en"], "tag")
        .await
        .unwrap();
    let ko_tag = db
        .store
        .add_localized_tag_tx(&mut tx, company, group, ids["ko"], "태그")
        .await
        .unwrap();

    let loaded = db
        .store
        .get_tag_group(&mut tx, group)
        .await
        .unwrap()
        .expect("group exists");
    assert_eq!(loaded.member_ids, vec![en_tag, ko_tag]);

    let state = db.store.delete_tag_tx(&mut tx, en_tag, group).await.unwrap();
    assert_eq!(state, corpdir_db::TagGroupState::Retained);

    // Not a member any more.
    let err = db
        .store
        .delete_tag_tx(&mut tx, en_tag, group)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let state = db.store.delete_tag_tx(&mut tx, ko_tag, group).await.unwrap();
    assert_eq!(state, corpdir_db::TagGroupState::Deleted);
    assert!(db.store.get_tag_group(&mut tx, group).await.unwrap().is_none());

    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_language_registration() {
    let db = setup().await;
    let code = unique("c").replace('_', "-");

    let mut handles = Vec::new();
    for i in 0..8 {
        let directory = db.directory.clone();
        let code = code.clone();
        let name = unique(&format!("Racer{}", i));
        handles.push(tokio::spawn(async move {
            directory
                .create_company(company_request(&[(code.as_str(), name.as_str())], &[]), &code)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("concurrent create");
    }

    let registered = db
        .directory
        .list_languages()
        .await
        .unwrap()
        .into_iter()
        .filter(|l| l.code == code)
        .count();
    assert_eq!(registered, 1);

    let mut conn = db.pool.acquire().await.unwrap();
    let id = db.languages.find_id(&mut conn, &code).await.unwrap();
    assert!(id.is_some());
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_query_engine_substring_is_language_scoped() {
    let db = setup().await;
    let marker = unique("Scoped");
    let ko = format!("{} 코리아", marker);
    let en = format!("{} Korea", marker);

    db.directory
        .create_company(
            company_request(&[("ko", ko.as_str()), ("en", en.as_str())], &[]),
            "ko",
        )
        .await
        .unwrap();

    let mut conn = db.pool.acquire().await.unwrap();
    let hits = db
        .query
        .search_by_name_substring(&mut conn, &marker, "en")
        .await
        .unwrap();
    assert_eq!(hits, vec![en.clone()]);

    let hits = db
        .query
        .search_by_name_substring(&mut conn, &marker, "ja")
        .await
        .unwrap();
    assert!(hits.is_empty());

    let company_id = db
        .query
        .find_company_by_exact_name(&mut conn, &en)
        .await
        .unwrap()
        .expect("company exists");
    let group = db
        .store
        .get_name_group(&mut conn, company_id)
        .await
        .unwrap()
        .expect("name group exists");
    assert_eq!(group.company_id, company_id);
    assert_eq!(group.member_ids.len(), 2);
}
