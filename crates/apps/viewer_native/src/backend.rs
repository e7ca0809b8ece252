//! Simulated texture backend: loads complete after a fixed number of polls
//! and every n-th load can be made to fail.
use std::collections::BTreeMap;

use foundation::ids::TextureId;
use streaming::backend::{LoadError, LoadOutcome, TextureBackend};
use streaming::request::LoadTicket;
use streaming::texture::{DecodedImage, Sampling};
use tracing::debug;

#[derive(Debug, Clone)]
struct InFlight {
    ticket: LoadTicket,
    url: String,
    due: u64,
    fail: bool,
}

#[derive(Debug, Default)]
pub struct SimulatedBackend {
    sizes: BTreeMap<String, (u32, u32)>,
    latency_frames: u32,
    fail_every: Option<u32>,
    polls: u64,
    begun: u64,
    in_flight: Vec<InFlight>,
    resident: BTreeMap<TextureId, (u32, u32)>,
    cancelled: u64,
    disposed: u64,
}

impl SimulatedBackend {
    /// `sizes` maps URLs to the pixel size their images decode to.
    pub fn new(sizes: BTreeMap<String, (u32, u32)>, latency_frames: u32, fail_every: Option<u32>) -> Self {
        Self {
            sizes,
            latency_frames,
            fail_every: fail_every.filter(|n| *n > 0),
            ..Self::default()
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn resident(&self) -> usize {
        self.resident.len()
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    pub fn disposed(&self) -> u64 {
        self.disposed
    }
}

impl TextureBackend for SimulatedBackend {
    fn begin_load(&mut self, ticket: LoadTicket, url: &str) {
        self.begun += 1;
        let fail = self.fail_every.is_some_and(|n| self.begun % n as u64 == 0);
        self.in_flight.push(InFlight {
            ticket,
            url: url.to_string(),
            due: self.polls + self.latency_frames as u64,
            fail,
        });
    }

    fn poll_loads(&mut self) -> Vec<LoadOutcome> {
        self.polls += 1;
        let now = self.polls;
        let (done, waiting): (Vec<InFlight>, Vec<InFlight>) =
            self.in_flight.drain(..).partition(|l| l.due < now);
        self.in_flight = waiting;

        done.into_iter()
            .map(|l| {
                let result = if l.fail {
                    Err(LoadError::Network(format!("simulated failure for {}", l.url)))
                } else {
                    let (width, height) = self.sizes.get(&l.url).copied().unwrap_or((1024, 1024));
                    Ok(DecodedImage { width, height })
                };
                LoadOutcome {
                    ticket: l.ticket,
                    url: l.url,
                    result,
                }
            })
            .collect()
    }

    fn cancel_load(&mut self, ticket: LoadTicket) {
        let before = self.in_flight.len();
        self.in_flight.retain(|l| l.ticket != ticket);
        self.cancelled += (before - self.in_flight.len()) as u64;
    }

    fn upload(&mut self, id: TextureId, image: &DecodedImage, sampling: &Sampling) {
        debug!(
            "upload {id:?} {}x{} mipmaps={} aniso={}",
            image.width, image.height, sampling.mipmaps, sampling.anisotropy
        );
        self.resident.insert(id, (image.width, image.height));
    }

    fn dispose(&mut self, id: TextureId) {
        if self.resident.remove(&id).is_some() {
            self.disposed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SimulatedBackend;
    use foundation::ids::TextureId;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use streaming::backend::TextureBackend;
    use streaming::request::LoadTicket;
    use streaming::texture::{DecodedImage, Sampling};

    fn ticket(id: u64) -> LoadTicket {
        LoadTicket { id, generation: 0 }
    }

    #[test]
    fn loads_complete_after_latency() {
        let sizes = BTreeMap::from([("a".to_string(), (800, 600))]);
        let mut b = SimulatedBackend::new(sizes, 2, None);
        b.begin_load(ticket(1), "a");
        assert!(b.poll_loads().is_empty());
        assert!(b.poll_loads().is_empty());
        let done = b.poll_loads();
        assert_eq!(done.len(), 1);
        assert_eq!(
            done[0].result,
            Ok(DecodedImage {
                width: 800,
                height: 600
            })
        );
    }

    #[test]
    fn zero_latency_completes_on_next_poll() {
        let mut b = SimulatedBackend::new(BTreeMap::new(), 0, None);
        b.begin_load(ticket(1), "x");
        assert_eq!(b.poll_loads().len(), 1);
    }

    #[test]
    fn every_nth_load_fails() {
        let mut b = SimulatedBackend::new(BTreeMap::new(), 0, Some(2));
        b.begin_load(ticket(1), "a");
        b.begin_load(ticket(2), "b");
        let done = b.poll_loads();
        assert!(done[0].result.is_ok());
        assert!(done[1].result.is_err());
    }

    #[test]
    fn cancel_and_dispose_are_counted() {
        let mut b = SimulatedBackend::new(BTreeMap::new(), 5, None);
        b.begin_load(ticket(1), "a");
        b.cancel_load(ticket(1));
        assert_eq!(b.in_flight(), 0);
        assert_eq!(b.cancelled(), 1);

        let img = DecodedImage {
            width: 1,
            height: 1,
        };
        b.upload(TextureId(1), &img, &Sampling::for_device(true));
        assert_eq!(b.resident(), 1);
        b.dispose(TextureId(1));
        b.dispose(TextureId(1));
        assert_eq!(b.disposed(), 1);
    }
}
