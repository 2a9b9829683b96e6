use pretty_assertions::assert_eq;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiki_scrape::config::{LocaleMapping, RetryPolicy, Settings, TranslatorSettings};
use wiki_scrape::localization::{HttpTranslationSource, Term, Translator};
use wiki_scrape::models::Namespace;
use wiki_scrape::storage::{Storage, XmlStorage};
use wiki_scrape::utils::http::create_client;

const FISH_JSON: &str = r#"{
    "sea_bass": {"file-name": "sea_bass", "name": {"name-en": "sea bass", "name-de": "Wolfsbarsch", "name-sp": "lubina"}},
    "koi": {"file-name": "koi", "name": {"name-en": "koi", "name-de": "Koi", "name-sp": "carpa koi"}}
}"#;

#[tokio::test]
async fn writes_one_values_directory_per_locale() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fish"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FISH_JSON))
        .expect(1)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let storage = XmlStorage::new(out.path());
    let values = storage.values_dir();
    storage
        .write_strings(
            &values,
            &Namespace::Resource("fish".into()),
            &[
                Term::new("sea_bass", "Sea Bass"),
                Term::new("pale_chub", "Pale Chub"),
                Term::new("koi", "Koi"),
            ],
        )
        .await
        .unwrap();
    storage
        .write_strings(&values, &Namespace::Generic, &[Term::new("pond", "Pond")])
        .await
        .unwrap();

    let translator_settings = TranslatorSettings {
        api_base_url: format!("{}/", server.uri()),
        categories: vec!["fish".to_string()],
        locales: vec![LocaleMapping::new("sp", "es"), LocaleMapping::new("de", "de")],
    };
    let client = create_client(&Settings::default()).unwrap();
    let source = HttpTranslationSource::new(client, &translator_settings.api_base_url, RetryPolicy::once());

    let summary = Translator::new(&source, &storage, &translator_settings)
        .run(&values, out.path())
        .await
        .unwrap();

    assert_eq!(summary.namespaces, 1);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.written.len(), 2);

    let spanish = storage
        .read_values(&out.path().join("values-es-rES"))
        .await
        .unwrap();
    assert_eq!(
        spanish,
        vec![(
            Namespace::Resource("fish".into()),
            vec![Term::new("sea_bass", "lubina"), Term::new("koi", "carpa koi")]
        )]
    );

    let german = fs::read_to_string(out.path().join("values-de-rDE/fish_strings.xml")).unwrap();
    assert!(german.contains(r#"<string name="sea_bass">Wolfsbarsch</string>"#));
    assert!(!german.contains("pale_chub"));
    assert!(!out.path().join("values-de-rDE/strings.xml").exists());
}
