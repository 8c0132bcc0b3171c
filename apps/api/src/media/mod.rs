// Third-party media adapter: speech synthesis (ElevenLabs) and transcription
// (OpenAI Whisper). Credentials stay on the server; the browser only ever
// talks to /api/speech and /api/transcribe.

pub mod speech;
pub mod transcribe;
pub mod voice;
