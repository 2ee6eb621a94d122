//! Small circuits shared by the backend tests.

use pwrap_circuit::{compile, solve, Api, Circuit, CircuitError, ConstraintSystem, Fr, Witness};

/// `x·y + y² == z` with `x` boolean; `z` and `x` public.
pub struct Product {
    pub x: u64,
    pub y: u64,
    pub z: u64,
}

impl Circuit for Product {
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
        let z = api.public_input(Fr::from(self.z));
        let x = api.public_input(Fr::from(self.x));
        let y = api.secret_input(Fr::from(self.y));
        api.assert_is_boolean(&x);
        let xy = api.mul(&x, &y);
        let yy = api.mul(&y, &y);
        let sum = api.add(&xy, &yy);
        api.assert_is_equal(&sum, &z);
        Ok(())
    }
}

/// Compiled system and satisfying witness for `1·6 + 36 == 42`.
pub fn product<CS: ConstraintSystem>() -> (CS, Witness) {
    let circuit = Product { x: 1, y: 6, z: 42 };
    let cs: CS = compile(&circuit).expect("compile");
    let witness = solve(&cs, &circuit).expect("solve");
    (cs, witness)
}
