use super::*;
use crate::runner::CommandResult;
use crate::testing::{FakeRunner, StaticFetcher};

const GH_URL: &str = "https://github.com/octocat.keys";
const LP_URL: &str = "https://launchpad.net/~ada/+sshkeys";

fn ok(body: &str) -> FetchResponse {
    FetchResponse {
        status: 200,
        body: body.to_string(),
    }
}

#[test]
fn test_provider_urls_lowercase_username() {
    assert_eq!(IdentityProvider::GitHub.key_url("OctoCat"), GH_URL);
    assert_eq!(IdentityProvider::Launchpad.key_url("Ada"), LP_URL);
}

#[test]
fn test_provider_parse() {
    assert_eq!(IdentityProvider::parse("GitHub"), Some(IdentityProvider::GitHub));
    assert_eq!(IdentityProvider::parse("lp"), Some(IdentityProvider::Launchpad));
    assert_eq!(IdentityProvider::parse("gitlab"), None);
}

#[test]
fn test_key_material_accepted_and_trimmed() {
    assert_eq!(
        validate_key_material(&ok("ssh-ed25519 AAAAC3 ada@host\n")),
        Some("ssh-ed25519 AAAAC3 ada@host".to_string())
    );
}

#[test]
fn test_non_key_content_rejected() {
    assert_eq!(validate_key_material(&ok("<!DOCTYPE html><html></html>")), None);
    assert_eq!(validate_key_material(&ok("<!doctype html>\n<p>hi</p>")), None);
    assert_eq!(
        validate_key_material(&ok("Lost something?\nError: Page not found\n")),
        None
    );
    assert_eq!(validate_key_material(&ok("  \n")), None);
    assert_eq!(
        validate_key_material(&FetchResponse {
            status: 404,
            body: "ssh-rsa AAAA".to_string()
        }),
        None
    );
}

#[test]
fn test_remote_fetch_returns_key() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new().with_body(GH_URL, 200, "ssh-rsa AAAAB3 octo\n");
    let provider = KeyProvider::new(&runner, &fetcher);

    let key = provider
        .obtain(&KeySource::RemoteFetch {
            provider: IdentityProvider::GitHub,
            username: "Octocat".into(),
        })
        .expect("key");

    assert_eq!(key.public_key, "ssh-rsa AAAAB3 octo");
    assert!(key.key_pair.is_none());
    assert_eq!(fetcher.requested(), vec![GH_URL.to_string()]);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_html_page_is_key_not_found() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new().with_body(LP_URL, 200, "<!DOCTYPE html><title>x</title>");
    let provider = KeyProvider::new(&runner, &fetcher);

    assert_eq!(
        provider
            .fetch_remote(IdentityProvider::Launchpad, "ada")
            .expect("no transport error"),
        None
    );

    let err = provider
        .obtain(&KeySource::RemoteFetch {
            provider: IdentityProvider::Launchpad,
            username: "ada".into(),
        })
        .expect_err("html is not a key");
    assert!(matches!(err, HostprepError::KeyFetchInvalid { .. }));
    assert!(err.is_key_acquisition());
}

#[test]
fn test_transport_error_is_distinct() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new().with_transport_error(GH_URL, "dns error");
    let provider = KeyProvider::new(&runner, &fetcher);

    let err = provider
        .fetch_remote(IdentityProvider::GitHub, "octocat")
        .expect_err("transport failure");
    match err {
        HostprepError::KeyFetchFailed { url, reason } => {
            assert_eq!(url, GH_URL);
            assert_eq!(reason, "dns error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_bad_provider_username_is_retryable_and_never_fetches() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    let err = provider
        .obtain(&KeySource::RemoteFetch {
            provider: IdentityProvider::GitHub,
            username: "../x".into(),
        })
        .expect_err("not a handle");
    assert!(matches!(err, HostprepError::KeyFetchInvalid { ref username, .. } if username == "../x"));
    assert!(err.is_key_acquisition());
    assert!(fetcher.requested().is_empty());
}

#[test]
fn test_launchpad_handle_with_plus() {
    let runner = FakeRunner::new();
    let url = "https://launchpad.net/~john+doe/+sshkeys";
    let fetcher = StaticFetcher::new().with_body(url, 200, "ssh-rsa AAAAB3 john\n");
    let provider = KeyProvider::new(&runner, &fetcher);

    let key = provider
        .obtain(&KeySource::RemoteFetch {
            provider: IdentityProvider::Launchpad,
            username: "john+doe".into(),
        })
        .expect("key");
    assert_eq!(key.public_key, "ssh-rsa AAAAB3 john");
    assert_eq!(fetcher.requested(), vec![url.to_string()]);
}

#[test]
fn test_unknown_launchpad_handle_is_retryable() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    let err = provider
        .obtain(&KeySource::RemoteFetch {
            provider: IdentityProvider::Launchpad,
            username: "john+doe".into(),
        })
        .expect_err("404");
    assert!(err.is_key_acquisition());
}

#[test]
fn test_empty_passphrase_rejected_before_keygen() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    for passphrase in [None, Some(Secret::new(""))] {
        let err = provider
            .obtain(&KeySource::LocalGenerate {
                has_passphrase: true,
                passphrase,
            })
            .expect_err("empty passphrase");
        assert!(matches!(err, HostprepError::PassphraseEmpty));
    }
    assert!(!runner.ran("ssh-keygen"));
}

#[test]
fn test_generated_key_pair() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    let key = provider
        .obtain(&KeySource::LocalGenerate {
            has_passphrase: true,
            passphrase: Some(Secret::new("correct horse")),
        })
        .expect("generated");

    assert_eq!(key.public_key, "ssh-rsa AAAAfakekey hostprep");
    let pair = key.key_pair.expect("key files");
    assert!(pair.private_key.is_file());
    assert!(pair.public_key.is_file());

    let invocation = &runner.invocations()[0];
    assert_eq!(invocation.program(), "ssh-keygen");
    assert!(!invocation.is_privileged());
    assert!(invocation.arguments().contains(&"correct horse".to_string()));
    assert!(!invocation.display().contains("correct horse"));
}

#[test]
fn test_generation_without_passphrase_uses_empty_one() {
    let runner = FakeRunner::new();
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    provider.generate(false, None).expect("generated");
    let args = runner.invocations()[0].arguments().to_vec();
    let n = args.iter().position(|a| a == "-N").expect("-N flag");
    assert_eq!(args[n + 1], "");
}

#[test]
fn test_keygen_failure_is_reported() {
    let runner = FakeRunner::new().respond(
        "ssh-keygen",
        vec![CommandResult::failure("Saving key failed: permission denied")],
    );
    let fetcher = StaticFetcher::new();
    let provider = KeyProvider::new(&runner, &fetcher);

    let err = provider.generate(false, None).expect_err("keygen fails");
    assert!(matches!(err, HostprepError::KeyGenerationFailed(ref m) if m.contains("permission denied")));
}
