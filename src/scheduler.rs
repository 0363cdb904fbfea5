//! 디바운스된 재계산과 단일 실행 워커.
//!
//! 입력 이벤트는 [`Debouncer::trigger`]로 들어오고, 지연 시간 안에 다시 들어온
//! 이벤트는 앞의 예약을 취소한다. 예약이 만료되면 [`CalcWorker::submit`]이 계산을
//! 블로킹 풀에서 실행하고, 결과는 표시 계층만 소비하는 단일 큐로 전달된다.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::{CalcError, CalculationInput, CalculationResult, Engine};

/// 수락된 계산에 붙는 일련번호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// 제출 결과. 이미 계산 중이면 새 요청은 버려진다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted(Ticket),
    Dropped,
}

/// 표시 계층으로 보내는 계산 완료 메시지.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcUpdate {
    Finished {
        ticket: Ticket,
        result: CalculationResult,
    },
    Failed {
        ticket: Ticket,
        error: CalcError,
    },
}

impl CalcUpdate {
    pub fn ticket(&self) -> Ticket {
        match self {
            CalcUpdate::Finished { ticket, .. } | CalcUpdate::Failed { ticket, .. } => *ticket,
        }
    }
}

/// 결과 큐의 소비 측.
pub type UpdateReceiver = mpsc::UnboundedReceiver<CalcUpdate>;

/// 워커가 실행하는 계산 함수.
pub type Calculation =
    Arc<dyn Fn(&CalculationInput) -> Result<CalculationResult, CalcError> + Send + Sync>;

/// 한 번에 하나의 계산만 실행하는 워커.
#[derive(Clone)]
pub struct CalcWorker {
    calculation: Calculation,
    in_flight: Arc<AtomicBool>,
    next_ticket: Arc<AtomicU64>,
    updates: mpsc::UnboundedSender<CalcUpdate>,
}

impl fmt::Debug for CalcWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalcWorker")
            .field("in_flight", &self.in_flight)
            .field("next_ticket", &self.next_ticket)
            .finish_non_exhaustive()
    }
}

impl CalcWorker {
    /// 엔진으로 계산하는 워커와 결과 큐의 수신 측을 함께 만든다.
    pub fn new(engine: Arc<Engine>) -> (Self, UpdateReceiver) {
        Self::with_calculation(Arc::new(move |input: &CalculationInput| engine.run(input)))
    }

    /// 임의의 계산 함수로 워커를 만든다.
    pub fn with_calculation(calculation: Calculation) -> (Self, UpdateReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self {
            calculation,
            in_flight: Arc::new(AtomicBool::new(false)),
            next_ticket: Arc::new(AtomicU64::new(1)),
            updates: tx,
        };
        (worker, rx)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// 계산을 제출한다. tokio 런타임 안에서 호출해야 한다.
    ///
    /// 다른 계산이 진행 중이면 대기열에 넣지 않고 `Submission::Dropped`를 돌려준다.
    pub fn submit(&self, input: CalculationInput) -> Submission {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("calculation already running, dropping request");
            return Submission::Dropped;
        }

        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let calculation = Arc::clone(&self.calculation);
        let in_flight = Arc::clone(&self.in_flight);
        let updates = self.updates.clone();
        debug!(ticket = ticket.0, "calculation accepted");

        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || calculation(&input)).await;
            let update = match outcome {
                Ok(Ok(result)) => CalcUpdate::Finished { ticket, result },
                Ok(Err(error)) => CalcUpdate::Failed { ticket, error },
                Err(join_err) => CalcUpdate::Failed {
                    ticket,
                    error: CalcError::Unexpected(join_err.to_string()),
                },
            };
            in_flight.store(false, Ordering::Release);
            if updates.send(update).is_err() {
                debug!(ticket = ticket.0, "update queue closed, result discarded");
            }
        });

        Submission::Accepted(ticket)
    }
}

/// `trigger` 호출 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scheduled,
    /// 대기 중이던 예약을 취소하고 새로 예약함
    Rescheduled,
}

/// 연속 입력을 하나의 계산으로 합친다.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    worker: CalcWorker,
    pending: Option<JoinHandle<Submission>>,
}

impl Debouncer {
    pub fn new(worker: CalcWorker, delay: Duration) -> Self {
        Self {
            delay,
            worker,
            pending: None,
        }
    }

    /// 지연 후 계산을 예약한다. 대기 중인 예약이 있으면 취소한다.
    pub fn trigger(&mut self, input: CalculationInput) -> Trigger {
        let replaced = self.cancel();
        let worker = self.worker.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            worker.submit(input)
        }));
        if replaced {
            debug!(delay_ms = delay.as_millis() as u64, "pending calculation rescheduled");
            Trigger::Rescheduled
        } else {
            Trigger::Scheduled
        }
    }

    /// 아직 실행되지 않은 예약을 취소한다. 취소한 예약이 있었으면 `true`.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
