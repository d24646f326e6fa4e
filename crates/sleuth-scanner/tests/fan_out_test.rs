use async_trait::async_trait;
use rand::Rng;
use sleuth_core::{QueryInput, Subject};
use sleuth_lookups::{Evidence, Lookup, LookupError, LookupOutcome, Result, Source};
use sleuth_scanner::{
    Collaborators, FanOutScheduler, Investigator, LookupTask, RunContext, TaskRegistry,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ALL_SOURCES: [Source; 12] = [
    Source::Dns,
    Source::GoogleSearch,
    Source::BreachDirectory,
    Source::HaveIBeenPwned,
    Source::EmailRep,
    Source::Hunter,
    Source::Intelx,
    Source::IpApi,
    Source::Psbdmp,
    Source::Instagram,
    Source::Spotify,
    Source::Twitter,
];

#[derive(Debug, Clone, Copy)]
enum Behavior {
    Found,
    Empty,
    Fail,
    Panic,
    Hang,
}

#[derive(Default)]
struct Concurrency {
    current: AtomicUsize,
    max: AtomicUsize,
}

/// Fake collaborator recording every query it receives.
struct RecordingLookup {
    source: Source,
    behavior: Behavior,
    delay: Duration,
    calls: Mutex<Vec<String>>,
    completed: AtomicUsize,
    concurrency: Arc<Concurrency>,
}

impl RecordingLookup {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Lookup for RecordingLookup {
    fn source(&self) -> Source {
        self.source
    }

    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>> {
        self.calls.lock().expect("calls lock").push(query.to_string());

        let running = self.concurrency.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.concurrency.max.fetch_max(running, Ordering::SeqCst);

        let delay = match self.behavior {
            Behavior::Hang => Duration::from_secs(30),
            _ => self.delay,
        };
        tokio::time::sleep(delay).await;

        self.concurrency.current.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            Behavior::Found | Behavior::Hang => Ok(vec![Evidence::new("query", query)]),
            Behavior::Empty => Ok(Vec::new()),
            Behavior::Fail => Err(LookupError::RateLimited {
                service: self.source,
            }),
            Behavior::Panic => panic!("{} exploded", self.source),
        }
    }
}

struct Fakes {
    lookups: HashMap<Source, Arc<RecordingLookup>>,
    concurrency: Arc<Concurrency>,
}

impl Fakes {
    fn new(configure: impl Fn(Source) -> (Behavior, Duration)) -> Self {
        let concurrency = Arc::new(Concurrency::default());
        let lookups = ALL_SOURCES
            .iter()
            .map(|&source| {
                let (behavior, delay) = configure(source);
                let lookup = RecordingLookup {
                    source,
                    behavior,
                    delay,
                    calls: Mutex::new(Vec::new()),
                    completed: AtomicUsize::new(0),
                    concurrency: Arc::clone(&concurrency),
                };
                (source, Arc::new(lookup))
            })
            .collect();

        Self {
            lookups,
            concurrency,
        }
    }

    fn found() -> Self {
        Self::new(|_| (Behavior::Found, Duration::ZERO))
    }

    fn get(&self, source: Source) -> Arc<RecordingLookup> {
        Arc::clone(&self.lookups[&source])
    }

    fn dyn_lookup(&self, source: Source) -> Arc<dyn Lookup> {
        self.get(source)
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            dns: self.dyn_lookup(Source::Dns),
            google_search: self.dyn_lookup(Source::GoogleSearch),
            breach_directory: self.dyn_lookup(Source::BreachDirectory),
            haveibeenpwned: self.dyn_lookup(Source::HaveIBeenPwned),
            emailrep: self.dyn_lookup(Source::EmailRep),
            hunter: self.dyn_lookup(Source::Hunter),
            intelx: self.dyn_lookup(Source::Intelx),
            ip_api: self.dyn_lookup(Source::IpApi),
            psbdmp: self.dyn_lookup(Source::Psbdmp),
            instagram: self.dyn_lookup(Source::Instagram),
            spotify: self.dyn_lookup(Source::Spotify),
            twitter: self.dyn_lookup(Source::Twitter),
        }
    }

    fn total_calls(&self) -> usize {
        self.lookups.values().map(|l| l.calls().len()).sum()
    }

    fn total_completed(&self) -> usize {
        self.lookups
            .values()
            .map(|l| l.completed.load(Ordering::SeqCst))
            .sum()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_alice_runs_every_lookup_and_groups_search() {
    let fakes = Fakes::found();
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

    let report = investigator
        .investigate("alice@example.com")
        .await
        .expect("valid subject");

    assert_eq!(report.subject.local_part(), "alice");
    assert_eq!(report.task_count(), 13);
    assert_eq!(fakes.total_calls(), 13);

    let mut google_calls = fakes.get(Source::GoogleSearch).calls();
    google_calls.sort();
    assert_eq!(google_calls, vec!["alice", "alice@example.com"]);

    let google = report.section("Google Search").expect("google section");
    let queries: Vec<_> = google.entries.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(queries, vec!["alice@example.com", "alice"]);
    assert!(google.entries.iter().all(|e| e.outcome.is_found()));

    let text = report.to_string();
    let full = text.find("query: alice@example.com").expect("full result");
    let local = text.find("query: alice\n").expect("local result");
    assert!(full < local);
}

#[tokio::test]
async fn test_input_without_separator_runs_nothing() {
    let fakes = Fakes::found();
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::default());

    let err = investigator
        .investigate("noatsign")
        .await
        .expect_err("no separator");

    assert!(err.is_invalid_subject());
    assert!(err.to_string().contains("noatsign"));
    assert_eq!(fakes.total_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failures_and_panics_stay_contained() {
    let fakes = Fakes::new(|source| match source {
        Source::Hunter => (Behavior::Fail, Duration::ZERO),
        Source::Spotify => (Behavior::Panic, Duration::from_millis(5)),
        Source::Psbdmp => (Behavior::Empty, Duration::ZERO),
        _ => (Behavior::Found, Duration::from_millis(20)),
    });
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

    let report = investigator
        .investigate("alice@example.com")
        .await
        .expect("run succeeds even with failures");

    assert_eq!(report.task_count(), 13);

    let hunter = &report.section("Hunter").expect("hunter").entries[0];
    assert_eq!(
        hunter.outcome,
        LookupOutcome::failed("rate limited by Hunter")
    );

    let social = report.section("Social Media").expect("social");
    let spotify = social
        .entries
        .iter()
        .find(|e| e.slot.source == Source::Spotify)
        .expect("spotify entry");
    match &spotify.outcome {
        LookupOutcome::Failed { reason } => {
            assert!(reason.starts_with("lookup panicked"), "{reason}");
            assert!(reason.contains("Spotify exploded"), "{reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let psbdmp = &report.section("Pastebin dumps").expect("psbdmp").entries[0];
    assert_eq!(psbdmp.outcome, LookupOutcome::NotFound);

    let found = report
        .sections
        .iter()
        .flat_map(|s| &s.entries)
        .filter(|e| e.outcome.is_found())
        .count();
    assert_eq!(found, 10);

    let text = report.to_string();
    assert!(text.contains("lookup failed: rate limited by Hunter"));
    assert!(text.contains("== Pastebin dumps ==\n  nothing found"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_report_does_not_depend_on_completion_order() {
    let mut rendered = Vec::new();

    for _ in 0..5 {
        let delays: HashMap<Source, u64> = ALL_SOURCES
            .iter()
            .map(|&s| (s, rand::thread_rng().gen_range(0..30)))
            .collect();
        let fakes = Fakes::new(|source| {
            let behavior = if source == Source::Twitter {
                Behavior::Fail
            } else {
                Behavior::Found
            };
            (behavior, Duration::from_millis(delays[&source]))
        });
        let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

        let report = investigator
            .investigate("alice@example.com")
            .await
            .expect("valid subject");

        let titles: Vec<_> = report.sections.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles.len(), 10);
        assert_eq!(titles[0], "EmailRep");
        assert_eq!(titles[9], "DNS records");

        rendered.push(report.to_string());
    }

    assert!(rendered.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_task_receives_only_its_bound_input() {
    let fakes = Fakes::found();
    let subject = Subject::parse("bob.smith@corp.example").expect("valid subject");
    let context = RunContext::new(subject, &fakes.collaborators());

    let reports = FanOutScheduler::new(16).run(context.registry()).await;

    for report in &reports {
        let expected = match report.slot.input {
            QueryInput::Full => "bob.smith@corp.example",
            QueryInput::LocalPart => "bob.smith",
        };
        assert_eq!(report.query, expected);
        assert_eq!(
            report.outcome,
            LookupOutcome::Found {
                evidence: vec![Evidence::new("query", expected)],
            }
        );
    }

    for source in ALL_SOURCES {
        let calls = fakes.get(source).calls();
        if source == Source::GoogleSearch {
            assert_eq!(calls.len(), 2);
        } else {
            assert_eq!(calls, vec!["bob.smith@corp.example"], "{source}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reports_follow_registry_order() {
    // Earlier tasks finish last
    let fakes = Fakes::new(|source| {
        let position = ALL_SOURCES.iter().position(|&s| s == source).unwrap_or(0);
        let delay = 5 * (ALL_SOURCES.len() - position) as u64;
        (Behavior::Found, Duration::from_millis(delay))
    });
    let subject = Subject::parse("alice@example.com").expect("valid subject");
    let registry = TaskRegistry::standard(&subject, &fakes.collaborators());

    let reports = FanOutScheduler::new(16).run(&registry).await;

    let expected: Vec<_> = registry.tasks().iter().map(LookupTask::slot).collect();
    let actual: Vec<_> = reports.iter().map(|r| r.slot).collect();
    assert_eq!(actual, expected);
    assert_eq!(actual[0].source, Source::Dns);
    assert_eq!(actual[2].input, QueryInput::LocalPart);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_barrier_waits_for_slowest_task() {
    let fakes = Fakes::new(|source| match source {
        Source::Dns => (Behavior::Found, Duration::from_millis(200)),
        _ => (Behavior::Found, Duration::ZERO),
    });
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

    let report = investigator
        .investigate("alice@example.com")
        .await
        .expect("valid subject");

    assert_eq!(fakes.total_completed(), 13);
    assert_eq!(fakes.get(Source::Dns).completed.load(Ordering::SeqCst), 1);
    assert!(report.section("DNS records").expect("dns").entries[0]
        .outcome
        .is_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_timeout_fails_only_the_slow_task() {
    let fakes = Fakes::new(|source| match source {
        Source::Intelx => (Behavior::Hang, Duration::ZERO),
        _ => (Behavior::Found, Duration::ZERO),
    });
    let scheduler = FanOutScheduler::new(16).with_task_timeout(Duration::from_millis(50));
    let investigator = Investigator::new(fakes.collaborators(), scheduler);

    let report = investigator
        .investigate("alice@example.com")
        .await
        .expect("valid subject");

    let intelx = &report.section("Intelligence X").expect("intelx").entries[0];
    assert_eq!(intelx.outcome, LookupOutcome::failed("timed out after 50ms"));

    let found = report
        .sections
        .iter()
        .flat_map(|s| &s.entries)
        .filter(|e| e.outcome.is_found())
        .count();
    assert_eq!(found, 12);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_width_bounds_running_lookups() {
    let fakes = Fakes::new(|_| (Behavior::Found, Duration::from_millis(10)));
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(1));

    let report = investigator
        .investigate("alice@example.com")
        .await
        .expect("valid subject");

    assert_eq!(report.task_count(), 13);
    assert_eq!(fakes.concurrency.max.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_wide_pool_runs_lookups_together() {
    let fakes = Fakes::new(|_| (Behavior::Found, Duration::from_millis(100)));
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

    investigator
        .investigate("alice@example.com")
        .await
        .expect("valid subject");

    assert!(fakes.concurrency.max.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_custom_registry() {
    let fakes = Fakes::found();
    let subject = Subject::parse("carol@example.org").expect("valid subject");
    let registry = TaskRegistry::new(vec![LookupTask::new(
        fakes.dyn_lookup(Source::Twitter),
        QueryInput::LocalPart,
        &subject,
    )]);

    let reports = FanOutScheduler::new(4).run(&registry).await;

    assert_eq!(reports.len(), 1);
    assert_eq!(fakes.get(Source::Twitter).calls(), vec!["carol"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_empty_local_part_still_runs_every_lookup() {
    let fakes = Fakes::found();
    let investigator = Investigator::new(fakes.collaborators(), FanOutScheduler::new(16));

    let report = investigator
        .investigate("@example.com")
        .await
        .expect("empty local part is accepted");

    assert_eq!(report.task_count(), 13);
    assert_eq!(report.subject.local_part(), "");

    let google = report.section("Google Search").expect("google section");
    let bound: Vec<_> = google
        .entries
        .iter()
        .map(|e| (e.slot.input, e.query.as_str()))
        .collect();
    assert_eq!(
        bound,
        vec![(QueryInput::Full, "@example.com"), (QueryInput::LocalPart, "")]
    );

    let mut google_calls = fakes.get(Source::GoogleSearch).calls();
    google_calls.sort();
    assert_eq!(google_calls, vec!["", "@example.com"]);

    for source in ALL_SOURCES {
        if source != Source::GoogleSearch {
            assert_eq!(fakes.get(source).calls(), vec!["@example.com"], "{source}");
        }
    }
}
