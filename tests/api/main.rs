mod health_check;
mod helpers;
mod sms_receiver;
mod subscribe;
mod unsubscribe;
mod vrm;
