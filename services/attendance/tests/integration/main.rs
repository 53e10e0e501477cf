mod http_test;
mod roster_test;
