// tests/integration/detection_pipeline_test.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use biosecurity_alerting::{
    AlertPipeline, AlertRegistry, AlertStatus, AlertType, AlertingError, DetectionEvent, DetectionFeed,
    DetectionGenerator, DetectionGeneratorConfig, DetectionSampler, DetectionSink, RandomSource, Severity,
};

const PERIOD: Duration = Duration::from_secs(8);
const JUST_AFTER: Duration = Duration::from_millis(1);

/// Draws served in order; the last one repeats forever.
struct ScriptedDraws {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedDraws {
    fn new(units: &[f64], indices: &[usize]) -> Self {
        Self {
            units: units.iter().copied().collect(),
            indices: indices.iter().copied().collect(),
        }
    }
}

fn next_or_last<T: Copy>(queue: &mut VecDeque<T>, fallback: T) -> T {
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(fallback)
    } else {
        queue.front().copied().unwrap_or(fallback)
    }
}

impl RandomSource for ScriptedDraws {
    fn unit(&mut self) -> f64 {
        next_or_last(&mut self.units, 0.99)
    }

    fn index(&mut self, len: usize) -> usize {
        next_or_last(&mut self.indices, 0) % len
    }
}

struct Harness {
    registry: Arc<AlertRegistry>,
    feed: Arc<DetectionFeed>,
    generator: DetectionGenerator,
}

fn harness(units: &[f64], indices: &[usize]) -> Harness {
    let registry = Arc::new(AlertRegistry::new());
    let feed = Arc::new(DetectionFeed::default());
    let pipeline = Arc::new(AlertPipeline::new(registry.clone(), feed.clone()));
    let sampler = DetectionSampler::with_defaults(Box::new(ScriptedDraws::new(units, indices)));
    let generator = DetectionGenerator::new(sampler, pipeline, DetectionGeneratorConfig::default());
    Harness {
        registry,
        feed,
        generator,
    }
}

#[tokio::test(start_paused = true)]
async fn low_draw_produces_one_alert_after_one_period() {
    let h = harness(&[0.1], &[2]);
    assert_eq!(h.generator.arm(), Ok(true));

    tokio::time::sleep(PERIOD + JUST_AFTER).await;

    assert_eq!(h.registry.len(), 1);
    let all = h.registry.all();
    let alert = &all[0];
    assert_eq!(alert.alert_type(), AlertType::Health);
    assert_eq!(alert.severity(), Severity::Critical);
    assert_eq!(alert.location(), "Chicken Coop 1");
    assert_eq!(alert.status(), AlertStatus::Active);
    assert!(alert.description().contains("95% confidence"));
    assert_eq!(h.feed.len(), 1);

    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn high_draw_produces_nothing() {
    let h = harness(&[0.5], &[0]);
    h.generator.arm().unwrap();

    tokio::time::sleep(PERIOD + JUST_AFTER).await;

    assert_eq!(h.generator.ticks_evaluated(), 1);
    assert!(h.registry.is_empty());
    assert!(h.feed.is_empty());
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn nothing_happens_before_the_first_period() {
    let h = harness(&[0.1], &[0]);
    h.generator.arm().unwrap();

    tokio::time::sleep(PERIOD - JUST_AFTER).await;

    assert_eq!(h.generator.ticks_evaluated(), 0);
    assert!(h.registry.is_empty());
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn arming_twice_keeps_a_single_timer() {
    let h = harness(&[0.1], &[0]);
    assert_eq!(h.generator.arm(), Ok(true));
    assert_eq!(h.generator.arm(), Ok(false));

    tokio::time::sleep(PERIOD * 3 + JUST_AFTER).await;

    assert_eq!(h.generator.ticks_evaluated(), 3);
    assert_eq!(h.registry.len(), 3);
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn disarm_stops_all_further_alerts() {
    let h = harness(&[0.1], &[0]);
    h.generator.arm().unwrap();
    tokio::time::sleep(PERIOD + JUST_AFTER).await;
    assert_eq!(h.registry.len(), 1);

    assert!(h.generator.disarm());
    assert!(!h.generator.disarm());
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(h.registry.len(), 1);
    assert!(!h.generator.is_armed());
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn rearming_restarts_the_cadence() {
    let h = harness(&[0.1], &[0]);
    h.generator.arm().unwrap();
    tokio::time::sleep(PERIOD / 2).await;
    h.generator.disarm();
    h.generator.arm().unwrap();

    // Half a period after the first arm would have fired the old timer.
    tokio::time::sleep(PERIOD / 2 + JUST_AFTER).await;
    assert!(h.registry.is_empty());

    tokio::time::sleep(PERIOD / 2).await;
    assert_eq!(h.registry.len(), 1);
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn alerts_are_listed_newest_first() {
    // Emit, skip, emit: templates 0 then 1.
    let h = harness(&[0.1, 0.9, 0.2], &[0, 1]);
    h.generator.arm().unwrap();

    tokio::time::sleep(PERIOD * 3 + JUST_AFTER).await;

    let all = h.registry.all();
    assert_eq!(h.generator.ticks_evaluated(), 3);
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].location(), "Water Station");
    assert_eq!(all[1].location(), "Pig Pen A");
    assert!(all[0].timestamp() >= all[1].timestamp());

    let feed = h.feed.latest();
    assert_eq!(feed[0].location, "Water Station");
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn feed_keeps_only_the_most_recent_detections() {
    let h = harness(&[0.0], &[0]);
    h.generator.arm().unwrap();

    tokio::time::sleep(PERIOD * 12 + JUST_AFTER).await;

    assert_eq!(h.registry.len(), 12);
    assert_eq!(h.feed.len(), h.feed.capacity());
    assert_eq!(h.feed.visible(5).len(), 5);
    h.generator.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn dropping_the_generator_cancels_the_timer() {
    let h = harness(&[0.1], &[0]);
    h.generator.arm().unwrap();
    let registry = h.registry.clone();
    drop(h);

    tokio::time::sleep(PERIOD * 2).await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn manual_tick_respects_arming() {
    let h = harness(&[0.1], &[1]);
    assert!(h.generator.tick_now().is_none());

    h.generator.arm().unwrap();
    let event = h.generator.tick_now().unwrap();
    assert_eq!(event.location, "Water Station");
    assert_eq!(h.registry.len(), 1);
    h.generator.dispose().await;
}

/// Holds each delivery until the test releases it.
struct GatedSink {
    pipeline: AlertPipeline,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
    delivered: AtomicBool,
}

impl DetectionSink for GatedSink {
    fn deliver(&self, event: DetectionEvent) -> Result<(), AlertingError> {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.pipeline.ingest(event)?;
        self.delivered.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn disarm_waits_for_a_tick_already_delivering() {
    let registry = Arc::new(AlertRegistry::new());
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let sink = Arc::new(GatedSink {
        pipeline: AlertPipeline::new(registry.clone(), Arc::new(DetectionFeed::default())),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
        delivered: AtomicBool::new(false),
    });
    let sampler = DetectionSampler::with_defaults(Box::new(ScriptedDraws::new(&[0.1], &[0])));
    let generator = DetectionGenerator::new(sampler, sink.clone(), DetectionGeneratorConfig::default());
    generator.arm().unwrap();
    let disarm_returned = AtomicBool::new(false);

    thread::scope(|scope| {
        let ticker = scope.spawn(|| generator.tick_now());
        // The tick has drawn and is now blocked inside deliver.
        entered_rx.recv().unwrap();

        let disarmer = scope.spawn(|| {
            let stopped = generator.disarm();
            disarm_returned.store(true, Ordering::SeqCst);
            (stopped, sink.delivered.load(Ordering::SeqCst), registry.len())
        });
        thread::sleep(Duration::from_millis(50));
        assert!(!disarm_returned.load(Ordering::SeqCst));

        release_tx.send(()).unwrap();
        assert!(ticker.join().unwrap().is_some());
        let (stopped, delivered_first, alerts_at_return) = disarmer.join().unwrap();
        assert!(stopped);
        assert!(delivered_first);
        assert_eq!(alerts_at_return, 1);
    });

    assert!(!generator.is_armed());
    assert!(generator.tick_now().is_none());
    assert_eq!(registry.len(), 1);
    generator.dispose().await;
}
