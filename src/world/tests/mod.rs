// Tests for the reconcile engine and broadcast scheduler
#![cfg(test)]
