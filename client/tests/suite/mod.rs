mod gateway;
mod stream;
