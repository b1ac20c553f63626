use alloy::{primitives::Address, rpc::types::Log, sol_types::SolEvent};
use deposit_relay::{models::Deposited, services::handler::HandlerError};
use proptest::{prelude::*, test_runner::Config};

use crate::properties::strategies::{
	create_handler, deposit_strategy, FIRST_NETWORK, SECOND_NETWORK,
};

// Six head words followed by the length word of `id`
const MIN_ENCODED_LEN: usize = 7 * 32;

fn deposit_log(event: &Deposited) -> Log {
	Log {
		inner: alloy::primitives::Log {
			address: Address::repeat_byte(0xa0),
			data: event.encode_log_data(),
		},
		..Default::default()
	}
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_deposit_is_routed_to_the_counterpart(
		event in deposit_strategy(),
		from_first in any::<bool>(),
	) {
		let handler = create_handler();
		let (source, target) = if from_first {
			(FIRST_NETWORK, SECOND_NETWORK)
		} else {
			(SECOND_NETWORK, FIRST_NETWORK)
		};

		let request = handler.handle(&deposit_log(&event), source).unwrap();

		prop_assert_eq!(request.target.name(), target);
		prop_assert_eq!(&request.deposit.source_network, source);
	}

	#[test]
	fn test_decoded_deposit_keeps_every_field(event in deposit_strategy()) {
		let handler = create_handler();

		let request = handler.handle(&deposit_log(&event), FIRST_NETWORK).unwrap();
		let call = request.deposit.release_params().to_call();

		prop_assert_eq!(&request.deposit.deposit_id, &event.id);
		prop_assert_eq!(request.deposit.nonce, event.nonce);
		prop_assert_eq!(request.deposit.source_block_number, event.blockNumber);
		prop_assert_eq!(call.id, event.id);
		prop_assert_eq!(call.to, event.msg_sender);
		prop_assert_eq!(call.amount, event.amount);
		prop_assert_eq!(call.sourceChainId, event.sourceChainId);
	}

	#[test]
	fn test_short_event_data_is_rejected(
		event in deposit_strategy(),
		len in 0..MIN_ENCODED_LEN,
	) {
		let handler = create_handler();
		let mut log = deposit_log(&event);
		let topics = log.inner.data.topics().to_vec();
		let data = log.inner.data.data.slice(..len);
		log.inner.data = alloy::primitives::LogData::new_unchecked(topics, data);

		let result = handler.handle(&log, FIRST_NETWORK);

		prop_assert!(
			matches!(result, Err(HandlerError::MalformedEvent { .. })),
			"expected a malformed event error"
		);
	}
}
