mod elevenlabs_client_test;
mod openai_chat_client_test;
mod openai_image_client_test;
mod openai_whisper_engine_test;
mod sqlite_session_repository_test;
