use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_engine::Debouncer;
use tokio::runtime::Handle;
use tokio::time::sleep;

const DELAY: Duration = Duration::from_millis(200);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce() + Send>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let make = move |value: u32| {
        let sink = sink.clone();
        Box::new(move || sink.lock().unwrap().push(value)) as Box<dyn FnOnce() + Send>
    };
    (calls, make)
}

#[tokio::test(start_paused = true)]
async fn rapid_schedules_collapse_into_last_call() {
    let debouncer = Debouncer::new(Handle::current());
    let (calls, make) = recorder();

    for value in 1..=5 {
        debouncer.schedule(make(value), DELAY);
        sleep(ms(50)).await;
    }
    // Last schedule at t=200ms, so it fires at t=400ms.
    sleep(ms(100)).await;
    assert!(calls.lock().unwrap().is_empty());
    assert!(debouncer.is_pending());

    sleep(ms(60)).await;
    assert_eq!(*calls.lock().unwrap(), vec![5]);
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn fires_once_after_quiet_period() {
    let debouncer = Debouncer::new(Handle::current());
    let (calls, make) = recorder();

    debouncer.schedule(make(1), DELAY);
    sleep(ms(190)).await;
    assert!(calls.lock().unwrap().is_empty());

    sleep(ms(20)).await;
    assert_eq!(*calls.lock().unwrap(), vec![1]);

    sleep(ms(500)).await;
    assert_eq!(*calls.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn cancel_before_firing_has_no_effect() {
    let debouncer = Debouncer::new(Handle::current());
    let (calls, make) = recorder();

    debouncer.schedule(make(1), DELAY);
    sleep(ms(100)).await;
    debouncer.cancel();
    sleep(ms(500)).await;

    assert!(calls.lock().unwrap().is_empty());
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn cancel_without_pending_is_noop() {
    let debouncer = Debouncer::new(Handle::current());
    debouncer.cancel();
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn reschedule_uses_new_delay_from_call_time() {
    let debouncer = Debouncer::new(Handle::current());
    let (calls, make) = recorder();

    debouncer.schedule(make(1), ms(500));
    sleep(ms(100)).await;
    debouncer.schedule(make(2), ms(50));
    sleep(ms(60)).await;

    assert_eq!(*calls.lock().unwrap(), vec![2]);
    sleep(ms(500)).await;
    assert_eq!(*calls.lock().unwrap(), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn separated_bursts_fire_separately() {
    let debouncer = Debouncer::new(Handle::current());
    let (calls, make) = recorder();

    debouncer.schedule(make(1), DELAY);
    sleep(ms(250)).await;
    debouncer.schedule(make(2), DELAY);
    sleep(ms(250)).await;

    assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_debouncer_cancels_pending_call() {
    let (calls, make) = recorder();
    {
        let debouncer = Debouncer::new(Handle::current());
        debouncer.schedule(make(1), DELAY);
    }
    sleep(ms(500)).await;
    assert!(calls.lock().unwrap().is_empty());
}
