//! # Image decoding worker
//!
//! PNG decoding is slow enough to stall the shell on large uploads, so it happens on a
//! dedicated thread. Jobs go in over one channel, results come back over another, and the
//! owner applies them to the editor on its own thread.

use std::sync::Arc;

use captioner_core::{
    derive::ImageKey,
    editor::{ImageLoadTicket, ImageSource},
    io::{data_url, upload},
    CanvasDimensions,
};

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("file is not a PNG image")]
    NotPng,
    #[error(transparent)]
    DataUrl(#[from] data_url::DataUrlError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub enum Job {
    /// A freshly uploaded file, to become the background image.
    Upload {
        ticket: ImageLoadTicket,
        bytes: Vec<u8>,
    },
    /// The document's image, to be made paintable.
    Derive { key: ImageKey, data_url: Arc<str> },
}

pub enum Done {
    Upload {
        ticket: ImageLoadTicket,
        result: Result<(ImageSource, Arc<image::RgbaImage>), DecodeError>,
    },
    Derive {
        key: ImageKey,
        result: Result<Arc<image::RgbaImage>, DecodeError>,
    },
}

/// Decode an uploaded PNG, yielding both the document's form of it and the paintable form.
pub fn decode_upload(bytes: &[u8]) -> Result<(ImageSource, image::RgbaImage), DecodeError> {
    if !upload::has_png_signature(bytes) {
        return Err(DecodeError::NotPng);
    }
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.into_rgba8();
    let source = ImageSource {
        data_url: data_url::encode_png(bytes).into(),
        dimensions: CanvasDimensions {
            width: image.width(),
            height: image.height(),
        },
    };
    Ok((source, image))
}

pub fn decode_data_url(url: &str) -> Result<image::RgbaImage, DecodeError> {
    let url = data_url::decode(url)?;
    Ok(image::load_from_memory(&url.bytes)?.into_rgba8())
}

fn run(job: Job) -> Done {
    match job {
        Job::Upload { ticket, bytes } => Done::Upload {
            ticket,
            result: decode_upload(&bytes).map(|(source, image)| (source, Arc::new(image))),
        },
        Job::Derive { key, data_url } => Done::Derive {
            key,
            result: decode_data_url(&data_url).map(Arc::new),
        },
    }
}

pub struct Decoder {
    jobs: Option<crossbeam::channel::Sender<Job>>,
    done: crossbeam::channel::Receiver<Done>,
    thread: Option<std::thread::JoinHandle<()>>,
}
impl Decoder {
    pub fn spawn() -> std::io::Result<Self> {
        let (jobs, job_recv) = crossbeam::channel::unbounded::<Job>();
        let (done_send, done) = crossbeam::channel::unbounded();
        let thread = std::thread::Builder::new()
            .name("Image decoder".to_owned())
            .spawn(move || {
                for job in job_recv {
                    if done_send.send(run(job)).is_err() {
                        // Owner's gone.
                        break;
                    }
                }
                log::trace!("decoder exiting");
            })?;
        Ok(Self {
            jobs: Some(jobs),
            done,
            thread: Some(thread),
        })
    }
    /// Queue a job. False if the worker has died.
    pub fn submit(&self, job: Job) -> bool {
        self.jobs
            .as_ref()
            .is_some_and(|jobs| jobs.send(job).is_ok())
    }
    /// A finished job, if any, without waiting.
    #[must_use]
    pub fn try_recv(&self) -> Option<Done> {
        self.done.try_recv().ok()
    }
    /// Wait up to `timeout` for a finished job.
    #[must_use]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Done> {
        self.done.recv_timeout(timeout).ok()
    }
}
impl Drop for Decoder {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.jobs = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("decoder thread panicked");
            }
        }
    }
}
