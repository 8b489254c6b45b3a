// Lock-free channel between the generators and the audio callback

use crate::messaging::command::AudioCommand;
use ringbuf::{HeapRb, traits::Split};

pub type AudioCommandProducer = ringbuf::HeapProd<AudioCommand>;
pub type AudioCommandConsumer = ringbuf::HeapCons<AudioCommand>;

pub fn create_audio_channel(capacity: usize) -> (AudioCommandProducer, AudioCommandConsumer) {
    let rb = HeapRb::<AudioCommand>::new(capacity);
    rb.split()
}
