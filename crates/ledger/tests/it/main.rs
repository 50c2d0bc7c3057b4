mod create;
mod mock;
mod redeem;
