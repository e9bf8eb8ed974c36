mod session_test;
mod storage_path_test;
